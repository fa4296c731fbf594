//! Raw syntax tree for MAL sources.
//!
//! The tree is produced by [`crate::parser`] and consumed, read-only, by the
//! semantic analyzer and the model converter. Every node carries the
//! [`Position`] of its first token.

pub mod ast;

pub use ast::{
    Ast, Asset, Association, AttackStep, AttackStepKind, Category, Cia, Define, Expr, ExprKind,
    Id, Include, Meta, Multiplicity, Reaches, Requires, TtcExpr, TtcExprKind, TtcOp, Variable,
};

pub use crate::base::Position;
