//! Typed step expressions and TTC expression trees.

use std::fmt;

use super::{AssetId, AttackStepId, FieldId, Model, VariableId};
use crate::semantic::Distribution;

/// A path expression with the asset types flowing in and out of every node.
///
/// `src`/`target` are the types a node declares; `sub_src`/`sub_target`
/// are the narrowed types actually used at this point after `[Type]`
/// annotations. Expressions that end in an attack step have no target.
#[derive(Debug, Clone, PartialEq)]
pub struct StepExpr {
    pub sub_src: AssetId,
    pub src: AssetId,
    pub target: Option<AssetId>,
    pub sub_target: Option<AssetId>,
    pub kind: StepKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    Field(FieldId),
    AttackStep(AttackStepId),
    /// `lhs.rhs`
    Collect(Box<StepExpr>, Box<StepExpr>),
    Union(Box<StepExpr>, Box<StepExpr>),
    Intersection(Box<StepExpr>, Box<StepExpr>),
    Difference(Box<StepExpr>, Box<StepExpr>),
    Transitive(Box<StepExpr>),
    Call(VariableId),
}

impl StepExpr {
    pub fn new(
        sub_src: AssetId,
        src: AssetId,
        target: Option<AssetId>,
        sub_target: Option<AssetId>,
        kind: StepKind,
    ) -> Self {
        Self {
            sub_src,
            src,
            target,
            sub_target,
            kind,
        }
    }

    /// A reference to `step`, reached from `sub_src`.
    pub fn attack_step(sub_src: AssetId, src: AssetId, step: AttackStepId) -> Self {
        Self::new(sub_src, src, None, None, StepKind::AttackStep(step))
    }

    /// The attack step this expression ends in, if any.
    pub fn terminal_step(&self) -> Option<AttackStepId> {
        match &self.kind {
            StepKind::AttackStep(step) => Some(*step),
            StepKind::Collect(_, rhs) => rhs.terminal_step(),
            _ => None,
        }
    }

    /// Render in source syntax, resolving names through `model`.
    pub fn display<'m>(&'m self, model: &'m Model) -> DisplayStepExpr<'m> {
        DisplayStepExpr { expr: self, model }
    }
}

pub struct DisplayStepExpr<'m> {
    expr: &'m StepExpr,
    model: &'m Model,
}

impl DisplayStepExpr<'_> {
    fn child<'c>(&'c self, expr: &'c StepExpr) -> DisplayStepExpr<'c> {
        DisplayStepExpr {
            expr,
            model: self.model,
        }
    }

    /// A call already carries any narrowing written in the variable's body.
    fn is_narrowed(&self) -> bool {
        let declared = match self.expr.kind {
            StepKind::Call(variable) => self.model[variable].expr.sub_target,
            _ => self.expr.target,
        };
        self.expr.target.is_some() && declared != self.expr.sub_target
    }
}

impl fmt::Display for DisplayStepExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;
        let narrowed = self.is_narrowed();
        match &self.expr.kind {
            StepKind::Field(field) => write!(f, "{}", model[*field].name)?,
            StepKind::AttackStep(step) => write!(f, "{}", model[*step].name)?,
            StepKind::Call(variable) => write!(f, "{}()", model[*variable].name)?,
            StepKind::Collect(lhs, rhs) => {
                if narrowed {
                    write!(f, "({}.{})", self.child(lhs), self.child(rhs))?;
                } else {
                    write!(f, "{}.{}", self.child(lhs), self.child(rhs))?;
                }
            }
            StepKind::Union(lhs, rhs) => {
                write!(f, "({} \\/ {})", self.child(lhs), self.child(rhs))?
            }
            StepKind::Intersection(lhs, rhs) => {
                write!(f, "({} /\\ {})", self.child(lhs), self.child(rhs))?
            }
            StepKind::Difference(lhs, rhs) => {
                write!(f, "({} - {})", self.child(lhs), self.child(rhs))?
            }
            StepKind::Transitive(inner) => match inner.kind {
                StepKind::Field(_) | StepKind::Call(_) => write!(f, "{}*", self.child(inner))?,
                _ => write!(f, "({})*", self.child(inner))?,
            },
        }
        match self.expr.sub_target {
            Some(sub_target) if narrowed => write!(f, "[{}]", model[sub_target].name),
            _ => Ok(()),
        }
    }
}

/// Time-to-compromise expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TtcExpr {
    Add(Box<TtcExpr>, Box<TtcExpr>),
    Sub(Box<TtcExpr>, Box<TtcExpr>),
    Mul(Box<TtcExpr>, Box<TtcExpr>),
    Div(Box<TtcExpr>, Box<TtcExpr>),
    Pow(Box<TtcExpr>, Box<TtcExpr>),
    Number(f64),
    Distribution(Distribution),
}

impl fmt::Display for TtcExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtcExpr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            TtcExpr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            TtcExpr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            TtcExpr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            TtcExpr::Pow(lhs, rhs) => write!(f, "({} ^ {})", lhs, rhs),
            TtcExpr::Number(value) => write!(f, "{:?}", value),
            TtcExpr::Distribution(distribution) => write!(f, "{}", distribution),
        }
    }
}
