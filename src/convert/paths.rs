//! Typing path expressions into [`StepExpr`] trees.

use super::{Binding, ConvertError, Converter};
use crate::model::{AssetId, StepExpr, StepKind, Variable, VariableId};
use crate::syntax::{self, Expr, ExprKind};

impl<'a> Converter<'a> {
    /// Convert a path that ends in an asset. `sub_target` is the narrowed
    /// type of an enclosing `[Type]`; `locals` are the step-local variables,
    /// visible only at the head of a path.
    pub(super) fn convert_to_asset(
        &mut self,
        expr: &'a Expr,
        asset: AssetId,
        sub_target: Option<AssetId>,
        locals: Option<&'a [syntax::Variable]>,
    ) -> Result<StepExpr, ConvertError> {
        match &expr.kind {
            ExprKind::Union(lhs, rhs)
            | ExprKind::Intersection(lhs, rhs)
            | ExprKind::Difference(lhs, rhs) => {
                let lhs = self.convert_to_asset(lhs, asset, None, locals)?;
                let rhs = self.convert_to_asset(rhs, asset, None, locals)?;
                let target = self.least_upper_bound(&lhs, &rhs)?;
                let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
                let kind = match &expr.kind {
                    ExprKind::Union(..) => StepKind::Union(lhs, rhs),
                    ExprKind::Intersection(..) => StepKind::Intersection(lhs, rhs),
                    _ => StepKind::Difference(lhs, rhs),
                };
                Ok(StepExpr::new(
                    asset,
                    asset,
                    Some(target),
                    Some(sub_target.unwrap_or(target)),
                    kind,
                ))
            }
            ExprKind::Step(lhs, rhs) => {
                let lhs = self.convert_to_asset(lhs, asset, None, locals)?;
                let next = self.sub_target(&lhs)?;
                let rhs = self.convert_to_asset(rhs, next, None, None)?;
                let target = rhs.sub_target;
                Ok(StepExpr::new(
                    asset,
                    asset,
                    target,
                    sub_target.or(target),
                    StepKind::Collect(Box::new(lhs), Box::new(rhs)),
                ))
            }
            ExprKind::Transitive(inner) => {
                let inner = self.convert_to_asset(inner, asset, None, locals)?;
                let target = inner.sub_target;
                Ok(StepExpr::new(
                    asset,
                    asset,
                    target,
                    sub_target.or(target),
                    StepKind::Transitive(Box::new(inner)),
                ))
            }
            ExprKind::SubType { expr, sub_type } => {
                let sub_type = self.asset_id(&sub_type.name)?;
                // the outermost narrowing wins
                self.convert_to_asset(expr, asset, Some(sub_target.unwrap_or(sub_type)), locals)
            }
            ExprKind::Id(id) => match self.lookup_variable(asset, id.as_str(), locals) {
                Some(binding) => self.call(asset, binding, sub_target),
                None => {
                    let field = self.model.field(asset, id.as_str()).ok_or_else(|| {
                        ConvertError::UnknownField {
                            asset: self.model[asset].name.clone(),
                            field: id.name.clone(),
                        }
                    })?;
                    let owner = self.model[field].asset;
                    let target = self.model[self.model[field].target].asset;
                    Ok(StepExpr::new(
                        asset,
                        owner,
                        Some(target),
                        Some(sub_target.unwrap_or(target)),
                        StepKind::Field(field),
                    ))
                }
            },
            ExprKind::Call(id) => {
                let binding = self
                    .lookup_variable(asset, id.as_str(), locals)
                    .ok_or_else(|| self.unknown_variable(asset, id))?;
                self.call(asset, binding, sub_target)
            }
        }
    }

    /// Convert a path that ends in an attack step.
    pub(super) fn convert_to_step(
        &mut self,
        expr: &'a Expr,
        asset: AssetId,
        locals: Option<&'a [syntax::Variable]>,
    ) -> Result<StepExpr, ConvertError> {
        match &expr.kind {
            ExprKind::Step(lhs, rhs) => {
                let lhs = self.convert_to_asset(lhs, asset, None, locals)?;
                let next = self.sub_target(&lhs)?;
                let rhs = self.convert_to_step(rhs, next, None)?;
                Ok(StepExpr::new(
                    asset,
                    asset,
                    None,
                    None,
                    StepKind::Collect(Box::new(lhs), Box::new(rhs)),
                ))
            }
            ExprKind::Id(id) => match self.lookup_variable(asset, id.as_str(), locals) {
                Some(binding) => self.inline(binding),
                None => {
                    let step = self.model.attack_step(asset, id.as_str()).ok_or_else(|| {
                        ConvertError::UnknownAttackStep {
                            asset: self.model[asset].name.clone(),
                            step: id.name.clone(),
                        }
                    })?;
                    Ok(StepExpr::attack_step(asset, self.model[step].asset, step))
                }
            },
            ExprKind::Call(id) => {
                let binding = self
                    .lookup_variable(asset, id.as_str(), locals)
                    .ok_or_else(|| self.unknown_variable(asset, id))?;
                self.inline(binding)
            }
            _ => Err(ConvertError::NotAttackStep(expr.to_string())),
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// Step-local variables first, then those of `asset` and its ancestors,
    /// most specific first.
    fn lookup_variable(
        &self,
        asset: AssetId,
        name: &str,
        locals: Option<&'a [syntax::Variable]>,
    ) -> Option<Binding<'a>> {
        let local = locals.and_then(|locals| {
            let variable = locals.iter().find(|v| v.name.as_str() == name)?;
            Some(Binding {
                variable,
                asset,
                locals: Some(locals),
            })
        });
        if local.is_some() {
            return local;
        }
        std::iter::once(asset)
            .chain(self.model.super_assets(asset))
            .find_map(|owner| {
                let source: &'a syntax::Asset = self.sources.get(owner.index()).copied()?;
                source
                    .variables
                    .iter()
                    .find(|v| v.name.as_str() == name)
                    .map(|variable| Binding {
                        variable,
                        asset: owner,
                        locals: None,
                    })
            })
    }

    /// A `Call` node for an asset-valued variable.
    fn call(
        &mut self,
        asset: AssetId,
        binding: Binding<'a>,
        sub_target: Option<AssetId>,
    ) -> Result<StepExpr, ConvertError> {
        let variable = self.variable(binding)?;
        let expr = &self.model[variable].expr;
        Ok(StepExpr::new(
            asset,
            expr.src,
            expr.target,
            sub_target.or(expr.sub_target),
            StepKind::Call(variable),
        ))
    }

    /// The model variable for `binding`, converting its body on first use.
    fn variable(&mut self, binding: Binding<'a>) -> Result<VariableId, ConvertError> {
        let key = &binding.variable.name.pos;
        if let Some(id) = self.variables.get(key) {
            return Ok(*id);
        }
        let expr = self.guarded(binding, |this| {
            this.convert_to_asset(&binding.variable.expr, binding.asset, None, binding.locals)
        })?;

        let name = binding.variable.name.name.clone();
        let id = VariableId::new(self.model.variables.len());
        tracing::trace!(variable = %name, "converted variable");
        self.model.variables.push(Variable {
            name: name.clone(),
            asset: binding.asset,
            expr,
        });
        if binding.locals.is_none() {
            self.model.assets[binding.asset.index()]
                .variables
                .insert(name, id);
        }
        self.variables.insert(key.clone(), id);
        Ok(id)
    }

    /// Expand a variable whose body ends in an attack step in place.
    fn inline(&mut self, binding: Binding<'a>) -> Result<StepExpr, ConvertError> {
        self.guarded(binding, |this| {
            this.convert_to_step(&binding.variable.expr, binding.asset, binding.locals)
        })
    }

    fn guarded<T>(
        &mut self,
        binding: Binding<'a>,
        f: impl FnOnce(&mut Self) -> Result<T, ConvertError>,
    ) -> Result<T, ConvertError> {
        let key = binding.variable.name.pos.clone();
        if !self.converting.insert(key.clone()) {
            return Err(ConvertError::VariableCycle(binding.variable.name.name.clone()));
        }
        let result = f(self);
        self.converting.remove(&key);
        result
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn sub_target(&self, expr: &StepExpr) -> Result<AssetId, ConvertError> {
        expr.sub_target
            .ok_or(ConvertError::Irreversible("a path without a target type"))
    }

    fn least_upper_bound(&self, lhs: &StepExpr, rhs: &StepExpr) -> Result<AssetId, ConvertError> {
        let (left, right) = (self.sub_target(lhs)?, self.sub_target(rhs)?);
        self.model
            .least_upper_bound(left, right)
            .ok_or_else(|| ConvertError::NoCommonAncestor {
                left: self.model[left].name.clone(),
                right: self.model[right].name.clone(),
            })
    }

    fn unknown_variable(&self, asset: AssetId, id: &syntax::Id) -> ConvertError {
        ConvertError::UnknownVariable {
            asset: self.model[asset].name.clone(),
            variable: id.name.clone(),
        }
    }
}
