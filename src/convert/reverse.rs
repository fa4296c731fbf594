//! Parent steps: every `reaches` path reversed and attached to the step it
//! reaches.
//!
//! For `A.x -> f.g.y` the path `f.g` (from A to the asset of `y`) is
//! stripped of its terminal step, reversed node by node and terminated
//! with `x` again, giving `y` the parent `g'.f'.x` where `f'` and `g'` are
//! the paired fields.

use super::{ConvertError, Converter};
use crate::model::{AssetId, AttackStepId, StepExpr, StepKind, Variable, VariableId};

impl Converter<'_> {
    pub(super) fn convert_parent_steps(&mut self) -> Result<(), ConvertError> {
        for index in 0..self.model.attack_steps.len() {
            let origin = AttackStepId::new(index);
            let reaches = self.model.attack_steps[index].reaches.clone();
            for expr in &reaches {
                let (target, parent) = self.parent_step(origin, expr)?;
                self.model.attack_steps[target.index()]
                    .parent_steps
                    .push(parent);
            }
        }
        Ok(())
    }

    /// The step reached by `expr` and the reversed path leading back to
    /// `origin` from it.
    fn parent_step(
        &mut self,
        origin: AttackStepId,
        expr: &StepExpr,
    ) -> Result<(AttackStepId, StepExpr), ConvertError> {
        let terminal = terminal(expr)?;
        let StepKind::AttackStep(target) = terminal.kind else {
            return Err(ConvertError::Irreversible("a path without an attack step"));
        };
        let target_asset = self.model[target].asset;

        if let StepKind::AttackStep(_) = expr.kind {
            let parent = StepExpr::attack_step(terminal.sub_src, target_asset, origin);
            return Ok((target, parent));
        }

        let stripped = strip_attack_step(expr)?;
        let mut reversed = self.reverse(&stripped, None)?;
        let mut end = reversed
            .sub_target
            .ok_or(ConvertError::Irreversible("a path without a target type"))?;
        // a variable inlined from an ancestor roots the path above the
        // asset that declares `origin`
        let origin_asset = self.model[origin].asset;
        if end != origin_asset && self.model.is_sub_type(origin_asset, end) {
            reversed.sub_target = Some(origin_asset);
            end = origin_asset;
        }
        let parent = StepExpr::new(
            terminal.sub_src,
            target_asset,
            None,
            None,
            StepKind::Collect(
                Box::new(reversed),
                Box::new(StepExpr::attack_step(end, end, origin)),
            ),
        );
        tracing::trace!(
            origin = %self.model[origin].name,
            target = %self.model[target].name,
            "derived parent step"
        );
        Ok((target, parent))
    }

    /// Reverse a path. `src` overrides the declared source type of the
    /// reversed node; set operators pass their own narrowed target down so
    /// both operands start from the same type.
    fn reverse(&mut self, step: &StepExpr, src: Option<AssetId>) -> Result<StepExpr, ConvertError> {
        let (Some(target), Some(sub_target)) = (step.target, step.sub_target) else {
            return Err(ConvertError::Irreversible("a path without a target type"));
        };
        let reversed = |kind| {
            StepExpr::new(
                sub_target,
                src.unwrap_or(target),
                Some(step.src),
                Some(step.sub_src),
                kind,
            )
        };

        Ok(match &step.kind {
            StepKind::Union(lhs, rhs) => {
                let lhs = self.reverse(lhs, Some(sub_target))?;
                let rhs = self.reverse(rhs, Some(sub_target))?;
                reversed(StepKind::Union(Box::new(rhs), Box::new(lhs)))
            }
            StepKind::Intersection(lhs, rhs) => {
                let lhs = self.reverse(lhs, Some(sub_target))?;
                let rhs = self.reverse(rhs, Some(sub_target))?;
                reversed(StepKind::Intersection(Box::new(rhs), Box::new(lhs)))
            }
            // operands keep their order
            StepKind::Difference(lhs, rhs) => {
                let lhs = self.reverse(lhs, Some(sub_target))?;
                let rhs = self.reverse(rhs, Some(sub_target))?;
                reversed(StepKind::Difference(Box::new(lhs), Box::new(rhs)))
            }
            StepKind::Collect(lhs, rhs) => {
                let rhs = self.reverse(rhs, None)?;
                let lhs = self.reverse(lhs, None)?;
                reversed(StepKind::Collect(Box::new(rhs), Box::new(lhs)))
            }
            StepKind::Transitive(inner) => {
                let inner = self.reverse(inner, None)?;
                StepExpr::new(
                    sub_target,
                    src.unwrap_or(sub_target),
                    Some(step.src),
                    Some(step.sub_src),
                    StepKind::Transitive(Box::new(inner)),
                )
            }
            StepKind::Field(field) => reversed(StepKind::Field(self.model[*field].target)),
            StepKind::Call(variable) => {
                let variable = self.reverse_variable(*variable)?;
                StepExpr::new(
                    sub_target,
                    src.unwrap_or(sub_target),
                    Some(step.src),
                    Some(step.sub_src),
                    StepKind::Call(variable),
                )
            }
            StepKind::AttackStep(_) => {
                return Err(ConvertError::Irreversible("an attack step reference"));
            }
        })
    }

    /// The reversed counterpart of `variable`, built on first use and
    /// owned by the asset the original path ends at.
    fn reverse_variable(&mut self, variable: VariableId) -> Result<VariableId, ConvertError> {
        if let Some(reversed) = self.reversed.get(&variable) {
            return Ok(*reversed);
        }
        let original = self.model[variable].clone();
        let end = original
            .expr
            .sub_target
            .ok_or(ConvertError::Irreversible("a variable without a target type"))?;
        let expr = self.reverse(&original.expr, Some(end))?;

        let id = VariableId::new(self.model.variables.len());
        self.model.variables.push(Variable {
            name: format!("reverse_{}", original.name).into(),
            asset: end,
            expr,
        });
        self.model.assets[end.index()].reverse_variables.push(id);
        self.reversed.insert(variable, id);
        Ok(id)
    }
}

/// The attack-step node a `reaches` path ends in.
fn terminal(expr: &StepExpr) -> Result<&StepExpr, ConvertError> {
    match &expr.kind {
        StepKind::AttackStep(_) => Ok(expr),
        StepKind::Collect(_, rhs) => terminal(rhs),
        _ => Err(ConvertError::Irreversible("a path without an attack step")),
    }
}

/// `expr` without its terminal attack step; `expr` must not be a bare step.
fn strip_attack_step(expr: &StepExpr) -> Result<StepExpr, ConvertError> {
    let StepKind::Collect(lhs, rhs) = &expr.kind else {
        return Err(ConvertError::Irreversible("a path without an attack step"));
    };
    if let StepKind::AttackStep(_) = rhs.kind {
        return Ok((**lhs).clone());
    }
    let rhs = strip_attack_step(rhs)?;
    Ok(StepExpr::new(
        expr.sub_src,
        expr.src,
        rhs.target,
        rhs.sub_target,
        StepKind::Collect(lhs.clone(), Box::new(rhs)),
    ))
}
