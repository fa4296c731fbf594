//! Attack steps: naming, overriding, CIA classifications and TTC.

use rustc_hash::FxHashSet;

use super::Analyzer;
use crate::semantic::distributions::{Distribution, RESTRICTED_IN_ARITHMETIC};
use crate::syntax::{Asset, AttackStep, AttackStepKind, TtcExpr, TtcExprKind};

impl<'a> Analyzer<'a> {
    pub(super) fn check_steps(&mut self) {
        let assets: Vec<_> = self.assets.values().copied().collect();
        for asset in assets {
            for step in &asset.attack_steps {
                if step.name.as_str().to_lowercase() == asset.name.as_str().to_lowercase() {
                    self.error(
                        &step.name.pos,
                        format!(
                            "Attack step '{}' shares name with asset '{}' defined at {}",
                            step.name, asset.name, asset.name.pos
                        ),
                    );
                }
            }
            self.read_steps(asset);
        }
    }

    /// Build the step scope chain of `asset`: one scope for the root
    /// ancestor and one more per ancestor (or the asset itself) that
    /// extends something.
    fn read_steps(&mut self, asset: &'a Asset) {
        let mut scope = self.steps.push(None);
        for parent in self.super_chain(asset) {
            if parent.parent.is_some() {
                scope = self.steps.push(Some(scope));
            }
            for step in &parent.attack_steps {
                self.add_step(scope, step);
            }
        }
        self.step_scopes.insert(asset.name.name.clone(), scope);
    }

    fn add_step(&mut self, scope: super::ScopeId, step: &'a AttackStep) {
        let name = step.name.as_str();
        if let Some(prev) = self.steps.look(scope, name).copied() {
            let message = format!(
                "Attack step '{}' previously defined at {}",
                step.name, prev.name.pos
            );
            self.error(&step.name.pos, message);
        } else if let Some(prev) = self.steps.lookup(scope, name).copied() {
            if prev.kind == step.kind {
                self.steps.add(scope, step.name.name.clone(), step);
            } else {
                let message = format!(
                    "Cannot override attack step '{}' previously defined at {} with different type '{}' =/= '{}'",
                    step.name, prev.name.pos, step.kind, prev.kind
                );
                self.error(&step.name.pos, message);
            }
        } else {
            match &step.reaches {
                Some(reaches) if reaches.inherits => self.error(
                    &reaches.pos,
                    format!(
                        "Cannot inherit attack step '{}' without previous definition",
                        step.name
                    ),
                ),
                _ => {
                    self.steps.add(scope, step.name.name.clone(), step);
                }
            }
        }
    }

    /// The most specific attack step `name` of `asset`, inherited or not.
    pub(super) fn step_of(&self, asset: &Asset, name: &str) -> Option<&'a AttackStep> {
        let scope = *self.step_scopes.get(&asset.name.name)?;
        self.steps.lookup(scope, name).copied()
    }

    pub(super) fn check_cia(&mut self) {
        let assets: Vec<_> = self.assets.values().copied().collect();
        for asset in assets {
            for step in &asset.attack_steps {
                let Some(cia) = &step.cia else { continue };
                if matches!(
                    step.kind,
                    AttackStepKind::Defense | AttackStepKind::Exist | AttackStepKind::NotExist
                ) {
                    self.error(&step.name.pos, "Defenses cannot have CIA classifications");
                }
                let mut seen = FxHashSet::default();
                for c in cia {
                    if !seen.insert(*c) {
                        self.warning(
                            &step.name.pos,
                            format!(
                                "Attack step {}.{} contains duplicate classification {{{}}}",
                                asset.name, step.name, c
                            ),
                        );
                    }
                }
            }
        }
    }

    pub(super) fn check_ttc(&mut self) {
        let assets: Vec<_> = self.assets.values().copied().collect();
        for asset in assets {
            for step in &asset.attack_steps {
                let Some(ttc) = &step.ttc else { continue };
                match step.kind {
                    AttackStepKind::Defense => self.check_defense_ttc(asset, step, ttc),
                    AttackStepKind::All | AttackStepKind::Any => self.check_ttc_expr(ttc, false),
                    // existence steps are reported by the reaches pass
                    AttackStepKind::Exist | AttackStepKind::NotExist => {}
                }
            }
        }
    }

    fn check_defense_ttc(&mut self, asset: &Asset, step: &AttackStep, ttc: &TtcExpr) {
        let TtcExprKind::Func { name, params } = &ttc.kind else {
            self.error(
                &step.pos,
                format!(
                    "Defense {}.{} may not have advanced TTC expressions",
                    asset.name, step.name
                ),
            );
            return;
        };
        match name.as_str() {
            "Enabled" | "Disabled" | "Bernoulli" => {
                if let Err(err) = Distribution::new(name.as_str(), params) {
                    self.error(&ttc.pos, err.to_string());
                }
            }
            _ => self.error(
                &step.pos,
                format!(
                    "Defense {}.{} may only have 'Enabled', 'Disabled', or 'Bernoulli(p)' as TTC",
                    asset.name, step.name
                ),
            ),
        }
    }

    /// `restricted` is set for everything beneath a `-`, `/` or `^`.
    fn check_ttc_expr(&mut self, expr: &TtcExpr, restricted: bool) {
        match &expr.kind {
            TtcExprKind::Binary { op, lhs, rhs } => {
                let restricted = restricted || op.is_restricted();
                self.check_ttc_expr(lhs, restricted);
                self.check_ttc_expr(rhs, restricted);
            }
            TtcExprKind::Func { name, params } => {
                if matches!(name.as_str(), "Enabled" | "Disabled") {
                    self.error(
                        &expr.pos,
                        "Distributions 'Enabled' or 'Disabled' may not be used as TTC values in '&' and '|' attack steps",
                    );
                    return;
                }
                if restricted && RESTRICTED_IN_ARITHMETIC.contains(&name.as_str()) {
                    self.error(
                        &expr.pos,
                        format!(
                            "TTC distribution '{}' is not available in subtraction, division or exponential expressions.",
                            name
                        ),
                    );
                }
                if let Err(err) = Distribution::new(name.as_str(), params) {
                    self.error(&expr.pos, err.to_string());
                }
            }
            TtcExprKind::Number(_) => {}
        }
    }
}
