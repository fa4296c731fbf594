//! Typed indices into the model arenas.

macro_rules! model_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

model_id!(
    /// Index of a [`Category`](super::Category).
    CategoryId
);
model_id!(
    /// Index of an [`Asset`](super::Asset).
    AssetId
);
model_id!(
    /// Index of a [`Field`](super::Field).
    FieldId
);
model_id!(
    /// Index of a [`Link`](super::Link).
    LinkId
);
model_id!(
    /// Index of an [`AttackStep`](super::AttackStep).
    AttackStepId
);
model_id!(
    /// Index of a [`Variable`](super::Variable).
    VariableId
);
