//! Variables, `requires`/`reaches` bodies and path-expression typing.
//!
//! A path is typed left to right. Each step either names a field (moving
//! to the asset on the far side of an association), a variable (whose
//! body is typed where it was declared) or, at the end of a `reaches`
//! path, an attack step. Variables visible from an asset are its own and
//! those of its ancestors; step-local `let`s shadow them but only at the
//! head of a path.

use super::{Abort, Analyzer, PassResult, ScopeId, VariableRef};
use crate::syntax::{Asset, AttackStep, Expr, ExprKind, Id, Variable};

impl<'a> Analyzer<'a> {
    pub(super) fn check_reaches(&mut self) -> PassResult {
        let assets: Vec<_> = self.assets.values().copied().collect();
        for &asset in &assets {
            self.read_variables(asset);
        }

        for asset in assets {
            let Some(scope) = self.variable_scopes.get(&asset.name.name).copied() else {
                continue;
            };
            for step in &asset.attack_steps {
                if step.kind.is_existence() {
                    if step.ttc.is_some() {
                        self.error(
                            &step.pos,
                            format!("Attack step of type '{}' must not have TTC", step.kind),
                        );
                        continue;
                    }
                    let Some(requires) = &step.requires else {
                        self.error(
                            &step.pos,
                            format!("Attack step of type '{}' must have require '<-'", step.kind),
                        );
                        continue;
                    };
                    let local = self.variables.push(Some(scope));
                    for variable in &requires.variables {
                        self.add_variable(local, asset, variable);
                    }
                    for expr in &requires.requires {
                        self.check_to_asset(asset, expr, local);
                    }
                } else if let Some(requires) = &step.requires {
                    self.error(
                        &requires.pos,
                        "Require '<-' may only be defined for attack step type exist 'E' or not-exist '!E'",
                    );
                    continue;
                }

                if let Some(reaches) = &step.reaches {
                    let local = self.variables.push(Some(scope));
                    for variable in &reaches.variables {
                        self.add_variable(local, asset, variable);
                    }
                    for expr in &reaches.reaches {
                        self.check_to_step(asset, expr, local);
                    }
                }
            }
        }

        if self.diagnostics.has_errors() {
            Err(Abort)
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    fn read_variables(&mut self, asset: &'a Asset) {
        let mut scope = self.variables.push(None);
        for parent in self.super_chain(asset) {
            if parent.parent.is_some() {
                scope = self.variables.push(Some(scope));
            }
            for variable in &parent.variables {
                self.add_variable(scope, parent, variable);
            }
        }
        self.variable_scopes.insert(asset.name.name.clone(), scope);
    }

    fn add_variable(&mut self, scope: ScopeId, asset: &'a Asset, variable: &'a Variable) {
        if let Some(prev) = self.variables.look(scope, variable.name.as_str()) {
            let message = format!(
                "Variable '{}' previously defined at {}",
                variable.name, prev.variable.name.pos
            );
            self.error(&variable.name.pos, message);
            return;
        }
        self.variable_references
            .entry(variable.name.pos.clone())
            .or_insert((variable, 0));
        self.variables
            .add(scope, variable.name.name.clone(), VariableRef { variable, asset });
    }

    /// The variable `name` visible from `scope`, with the scope that binds it.
    fn variable_in(&self, scope: ScopeId, name: &str) -> Option<(VariableRef<'a>, ScopeId)> {
        let bound = self.variables.scope_for(scope, name)?;
        let variable = self.variables.look(bound, name).copied()?;
        Some((variable, bound))
    }

    /// Mark `variable` as being resolved. Returns false, after reporting the
    /// cycle, if it already is.
    fn enter_variable(&mut self, variable: &'a Variable) -> bool {
        if let Some((_, count)) = self.variable_references.get_mut(&variable.name.pos) {
            *count += 1;
        }
        if !self.evaluating.contains_key(&variable.name.pos) {
            self.evaluating.insert(variable.name.pos.clone(), variable);
            return true;
        }

        let mut path: Vec<&str> = self.evaluating.values().map(|v| v.name.as_str()).collect();
        path.push(variable.name.as_str());
        if let Some((_, first)) = self.evaluating.first() {
            let first = *first;
            let message = format!(
                "Variable '{}' contains cycle '{}'",
                first.name,
                path.join(" -> ")
            );
            self.error(&first.name.pos, message);
        }
        false
    }

    fn exit_variable(&mut self, variable: &Variable) {
        self.evaluating.shift_remove(&variable.name.pos);
    }

    fn variable_to_asset(&mut self, variable: VariableRef<'a>, bound: ScopeId) -> Option<&'a Asset> {
        if !self.enter_variable(variable.variable) {
            return None;
        }
        let target = self.check_to_asset(variable.asset, &variable.variable.expr, bound);
        self.exit_variable(variable.variable);
        target
    }

    fn variable_to_step(
        &mut self,
        variable: VariableRef<'a>,
        bound: ScopeId,
    ) -> Option<&'a AttackStep> {
        if !self.enter_variable(variable.variable) {
            return None;
        }
        let step = self.check_to_step(variable.asset, &variable.variable.expr, bound);
        self.exit_variable(variable.variable);
        step
    }

    fn undefined_variable(&mut self, asset: &Asset, id: &Id) {
        self.error(
            &id.pos,
            format!("Variable '{}' not defined for asset '{}'", id, asset.name),
        );
    }

    /// The variable scope used for the right-hand side of `lhs.rhs` once
    /// `lhs` has been typed as `target`.
    fn member_scope(&self, target: &Asset) -> Option<ScopeId> {
        self.variable_scopes.get(&target.name.name).copied()
    }

    // ========================================================================
    // Path typing
    // ========================================================================

    /// Type a path that must end in an attack step.
    fn check_to_step(
        &mut self,
        asset: &'a Asset,
        expr: &'a Expr,
        scope: ScopeId,
    ) -> Option<&'a AttackStep> {
        match &expr.kind {
            ExprKind::Id(id) => {
                let variable = self.variable_in(scope, id.as_str());
                let step = self.step_of(asset, id.as_str());
                match (variable, step) {
                    (Some((variable, bound)), step) => {
                        if let Some(step) = step {
                            self.warning(
                                &id.pos,
                                format!(
                                    "Step '{}' defined as variable at {} and attack step at {}",
                                    id, variable.variable.name.pos, step.name.pos
                                ),
                            );
                        }
                        self.variable_to_step(variable, bound)
                    }
                    (None, Some(step)) => Some(step),
                    (None, None) => {
                        self.error(
                            &id.pos,
                            format!("Attack step '{}' not defined for asset '{}'", id, asset.name),
                        );
                        None
                    }
                }
            }
            ExprKind::Call(id) => match self.variable_in(scope, id.as_str()) {
                Some((variable, bound)) => self.variable_to_step(variable, bound),
                None => {
                    self.undefined_variable(asset, id);
                    None
                }
            },
            ExprKind::Step(lhs, rhs) => {
                let target = self.check_to_asset(asset, lhs, scope)?;
                let scope = self.member_scope(target)?;
                self.check_to_step(target, rhs, scope)
            }
            _ => {
                self.error(&expr.pos, "Last step is not attack step");
                None
            }
        }
    }

    /// Type a path that must end in an asset.
    fn check_to_asset(
        &mut self,
        asset: &'a Asset,
        expr: &'a Expr,
        scope: ScopeId,
    ) -> Option<&'a Asset> {
        match &expr.kind {
            ExprKind::Step(lhs, rhs) => {
                let target = self.check_to_asset(asset, lhs, scope)?;
                let scope = self.member_scope(target)?;
                self.check_to_asset(target, rhs, scope)
            }
            ExprKind::Id(id) => {
                let variable = self.variable_in(scope, id.as_str());
                let field = self.field_of(asset, id.as_str());
                match (variable, field) {
                    (Some((variable, bound)), field) => {
                        if let Some(field) = field {
                            self.warning(
                                &id.pos,
                                format!(
                                    "Step '{}' defined as variable at {} and field at {}",
                                    id,
                                    variable.variable.name.pos,
                                    field.id().pos
                                ),
                            );
                        }
                        self.variable_to_asset(variable, bound)
                    }
                    (None, _) => self.get_target(asset, id),
                }
            }
            ExprKind::Call(id) => match self.variable_in(scope, id.as_str()) {
                Some((variable, bound)) => self.variable_to_asset(variable, bound),
                None => {
                    self.undefined_variable(asset, id);
                    None
                }
            },
            ExprKind::Union(lhs, rhs)
            | ExprKind::Intersection(lhs, rhs)
            | ExprKind::Difference(lhs, rhs) => {
                let left = self.check_to_asset(asset, lhs, scope);
                let right = self.check_to_asset(asset, rhs, scope);
                let (left, right) = (left?, right?);
                let common = self.least_upper_bound(left, right);
                if common.is_none() {
                    self.error(
                        &expr.pos,
                        format!(
                            "Types '{}' and '{}' have no common ancestor",
                            left.name, right.name
                        ),
                    );
                }
                common
            }
            ExprKind::Transitive(inner) => {
                let target = self.check_to_asset(asset, inner, scope)?;
                if self.is_sub_type(target, asset) {
                    Some(target)
                } else {
                    self.error(
                        &expr.pos,
                        format!(
                            "Previous asset '{}' is not of type '{}'",
                            target.name, asset.name
                        ),
                    );
                    None
                }
            }
            ExprKind::SubType { expr: inner, sub_type } => {
                let target = self.check_to_asset(asset, inner, scope)?;
                let sub_type = self.get_asset(sub_type)?;
                if self.is_sub_type(sub_type, target) {
                    Some(sub_type)
                } else {
                    self.error(
                        &expr.pos,
                        format!(
                            "Asset '{}' cannot be of type '{}'",
                            target.name, sub_type.name
                        ),
                    );
                    None
                }
            }
        }
    }

    /// Follow the field `id` of `asset`, counting the reference.
    fn get_target(&mut self, asset: &'a Asset, id: &Id) -> Option<&'a Asset> {
        match self.field_of(asset, id.as_str()) {
            Some(field) => {
                self.add_field_reference(field);
                self.get_asset(field.target())
            }
            None => {
                self.error(
                    &id.pos,
                    format!("Field '{}' not defined for asset '{}'", id, asset.name),
                );
                None
            }
        }
    }
}
