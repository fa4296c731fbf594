//! # Model Graph
//!
//! The resolved language model handed to code generators and simulators.
//! Entities live in flat arenas owned by [`Model`] and refer to each other
//! through typed ids, so the graph (super assets, paired fields, parent
//! steps) carries no reference cycles.
//!
//! Lookups by name walk the super-asset chain from the most specific asset,
//! so overriding attack steps shadow the ones they override.

mod expr;
mod ids;

use std::ops::Index;

use indexmap::IndexMap;
use smol_str::SmolStr;

pub use expr::{DisplayStepExpr, StepExpr, StepKind, TtcExpr};
pub use ids::{AssetId, AttackStepId, CategoryId, FieldId, LinkId, VariableId};

pub use crate::syntax::AttackStepKind;

/// Metadata kind → value, in declaration order.
pub type Meta = IndexMap<SmolStr, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: SmolStr,
    pub meta: Meta,
    pub assets: Vec<AssetId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: SmolStr,
    pub is_abstract: bool,
    pub category: CategoryId,
    pub super_asset: Option<AssetId>,
    pub meta: Meta,
    /// Fields declared on this asset only.
    pub fields: IndexMap<SmolStr, FieldId>,
    /// Attack steps declared on this asset only.
    pub attack_steps: IndexMap<SmolStr, AttackStepId>,
    pub variables: IndexMap<SmolStr, VariableId>,
    /// Reversed variables whose reversed path starts at this asset.
    pub reverse_variables: Vec<VariableId>,
}

/// One end of a link, as seen from the asset that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: SmolStr,
    pub asset: AssetId,
    pub min: u32,
    /// `None` is unbounded.
    pub max: Option<u32>,
    pub link: LinkId,
    /// The paired field on the other side of the link.
    pub target: FieldId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub name: SmolStr,
    pub meta: Meta,
    pub left_field: FieldId,
    pub right_field: FieldId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cia {
    pub confidentiality: bool,
    pub integrity: bool,
    pub availability: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackStep {
    pub name: SmolStr,
    pub kind: AttackStepKind,
    pub asset: AssetId,
    /// Declared with `+>`: the reaches of the overridden step still apply.
    pub inherits_reaches: bool,
    pub cia: Option<Cia>,
    pub ttc: Option<TtcExpr>,
    pub tags: Vec<SmolStr>,
    pub meta: Meta,
    pub requires: Vec<StepExpr>,
    pub reaches: Vec<StepExpr>,
    /// Reversed `reaches` of other steps that lead here.
    pub parent_steps: Vec<StepExpr>,
}

/// A named path shared by [`StepKind::Call`] nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: SmolStr,
    pub asset: AssetId,
    pub expr: StepExpr,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub(crate) defines: IndexMap<SmolStr, String>,
    pub(crate) categories: Vec<Category>,
    pub(crate) assets: Vec<Asset>,
    pub(crate) fields: Vec<Field>,
    pub(crate) links: Vec<Link>,
    pub(crate) attack_steps: Vec<AttackStep>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) category_index: IndexMap<SmolStr, CategoryId>,
    pub(crate) asset_index: IndexMap<SmolStr, AssetId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Lookup by name
    // ========================================================================

    pub fn define(&self, key: &str) -> Option<&str> {
        self.defines.get(key).map(String::as_str)
    }

    pub fn defines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.category_index.get(name).copied()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.category_id(name).map(|id| &self[id])
    }

    pub fn asset_id(&self, name: &str) -> Option<AssetId> {
        self.asset_index.get(name).copied()
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.asset_id(name).map(|id| &self[id])
    }

    /// The field `name` of `asset` or of its nearest ancestor declaring it.
    pub fn field(&self, asset: AssetId, name: &str) -> Option<FieldId> {
        self.self_and_super_assets(asset)
            .find_map(|a| self[a].fields.get(name).copied())
    }

    /// The most specific attack step `name` visible from `asset`.
    pub fn attack_step(&self, asset: AssetId, name: &str) -> Option<AttackStepId> {
        self.self_and_super_assets(asset)
            .find_map(|a| self[a].attack_steps.get(name).copied())
    }

    /// The variable `name` of `asset` or of its nearest ancestor declaring it.
    pub fn variable(&self, asset: AssetId, name: &str) -> Option<VariableId> {
        self.self_and_super_assets(asset)
            .find_map(|a| self[a].variables.get(name).copied())
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    pub fn categories(&self) -> impl Iterator<Item = (CategoryId, &Category)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, c)| (CategoryId::new(i), c))
    }

    pub fn assets(&self) -> impl Iterator<Item = (AssetId, &Asset)> {
        self.assets
            .iter()
            .enumerate()
            .map(|(i, a)| (AssetId::new(i), a))
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, l)| (LinkId::new(i), l))
    }

    pub fn attack_steps(&self) -> impl Iterator<Item = (AttackStepId, &AttackStep)> {
        self.attack_steps
            .iter()
            .enumerate()
            .map(|(i, s)| (AttackStepId::new(i), s))
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (VariableId::new(i), v))
    }

    // ========================================================================
    // Inheritance lattice
    // ========================================================================

    /// Ancestors of `asset`, nearest first.
    pub fn super_assets(&self, asset: AssetId) -> SuperAssets<'_> {
        SuperAssets {
            model: self,
            next: self.assets.get(asset.index()).and_then(|a| a.super_asset),
            remaining: self.assets.len(),
        }
    }

    fn self_and_super_assets(&self, asset: AssetId) -> impl Iterator<Item = AssetId> + '_ {
        std::iter::once(asset).chain(self.super_assets(asset))
    }

    /// Whether `child` is `parent` or one of its descendants.
    pub fn is_sub_type(&self, child: AssetId, parent: AssetId) -> bool {
        self.self_and_super_assets(child).any(|a| a == parent)
    }

    /// The nearest asset both `left` and `right` are sub types of.
    pub fn least_upper_bound(&self, left: AssetId, right: AssetId) -> Option<AssetId> {
        let (mut left, mut right) = (left, right);
        // a cyclic chain never runs out of super assets
        for _ in 0..=self.assets.len() {
            if self.is_sub_type(left, right) {
                return Some(right);
            }
            if self.is_sub_type(right, left) {
                return Some(left);
            }
            let next_left = self[left].super_asset;
            let next_right = self[right].super_asset;
            if next_left.is_none() && next_right.is_none() {
                return None;
            }
            left = next_left.unwrap_or(left);
            right = next_right.unwrap_or(right);
        }
        None
    }
}

/// Iterator over an asset's ancestors; see [`Model::super_assets`].
pub struct SuperAssets<'m> {
    model: &'m Model,
    next: Option<AssetId>,
    /// Bounds the walk should the chain ever be cyclic.
    remaining: usize,
}

impl Iterator for SuperAssets<'_> {
    type Item = AssetId;

    fn next(&mut self) -> Option<AssetId> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self
            .model
            .assets
            .get(current.index())
            .and_then(|a| a.super_asset);
        Some(current)
    }
}

macro_rules! model_index {
    ($id:ty, $item:ty, $arena:ident) => {
        impl Index<$id> for Model {
            type Output = $item;

            fn index(&self, id: $id) -> &$item {
                &self.$arena[id.index()]
            }
        }
    };
}

model_index!(CategoryId, Category, categories);
model_index!(AssetId, Asset, assets);
model_index!(FieldId, Field, fields);
model_index!(LinkId, Link, links);
model_index!(AttackStepId, AttackStep, attack_steps);
model_index!(VariableId, Variable, variables);
