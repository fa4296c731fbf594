//! Association fields, association endpoints and unused declarations.

use super::{Abort, Analyzer, End, FieldRef, PassResult, ScopeId};
use crate::syntax::Asset;

impl<'a> Analyzer<'a> {
    pub(super) fn check_fields(&mut self) {
        let assets: Vec<_> = self.assets.values().copied().collect();
        for asset in assets {
            self.read_fields(asset);
        }
    }

    /// Build the field scope chain of `asset`, shaped like its step chain.
    fn read_fields(&mut self, asset: &'a Asset) {
        let ast = self.ast;
        let mut scope = self.fields.push(None);
        for parent in self.super_chain(asset) {
            if parent.parent.is_some() {
                scope = self.fields.push(Some(scope));
            }
            for (index, association) in ast.associations.iter().enumerate() {
                if association.left_asset.name == parent.name.name {
                    let field = FieldRef { index, association, end: End::Right };
                    self.add_field(scope, parent, asset, field);
                }
                // an association may connect an asset to itself
                if association.right_asset.name == parent.name.name {
                    let field = FieldRef { index, association, end: End::Left };
                    self.add_field(scope, parent, asset, field);
                }
            }
        }
        self.field_scopes.insert(asset.name.name.clone(), scope);
    }

    fn add_field(&mut self, scope: ScopeId, parent: &Asset, asset: &Asset, field: FieldRef<'a>) {
        let id = field.id();
        if let Some(prev) = self.fields.lookdown(scope, id.as_str()).copied() {
            let message = format!(
                "Field {}.{} previously defined at {}",
                parent.name,
                id,
                prev.id().pos
            );
            self.error(&id.pos, message);
        } else if let Some(step) = self.step_of(asset, id.as_str()) {
            let message = format!(
                "Field '{}' previously defined as attack step at {}",
                id, step.name.pos
            );
            self.error(&id.pos, message);
        } else {
            self.fields.add(scope, id.name.clone(), field);
        }
    }

    /// The field `name` as seen from `asset`, including inherited ones.
    pub(super) fn field_of(&self, asset: &Asset, name: &str) -> Option<FieldRef<'a>> {
        let scope = *self.field_scopes.get(&asset.name.name)?;
        self.fields.lookdown(scope, name).copied()
    }

    pub(super) fn add_field_reference(&mut self, field: FieldRef<'a>) {
        if let Some(counts) = self.field_references.get_mut(field.index) {
            match field.end {
                End::Left => counts[0] += 1,
                End::Right => counts[1] += 1,
            }
        }
    }

    /// Both endpoints of every association must be defined assets.
    pub(super) fn check_associations(&mut self) -> PassResult {
        let ast = self.ast;
        let mut failed = false;
        for association in &ast.associations {
            if !self.assets.contains_key(&association.left_asset.name) {
                self.error(
                    &association.left_asset.pos,
                    format!("Left asset '{}' is not defined", association.left_asset),
                );
                failed = true;
            }
            if !self.assets.contains_key(&association.right_asset.name) {
                self.error(
                    &association.right_asset.pos,
                    format!("Right asset '{}' is not defined", association.right_asset),
                );
                failed = true;
            }
        }
        if failed { Err(Abort) } else { Ok(()) }
    }

    pub(super) fn check_unused(&mut self) {
        let unused: Vec<_> = self
            .variable_references
            .values()
            .filter(|(_, count)| *count == 0)
            .map(|(variable, _)| *variable)
            .collect();
        for variable in unused {
            self.warning(
                &variable.name.pos,
                format!("Variable '{}' is never used", variable.name),
            );
        }

        let ast = self.ast;
        for (association, counts) in ast.associations.iter().zip(&self.field_references) {
            if counts == &[0, 0] {
                self.diagnostics.warning(
                    &association.pos,
                    format!("Association '{}' is never used", association.to_short_string()),
                );
            }
        }
    }
}
