//! Syntax tree node types.

use std::fmt;

use smol_str::SmolStr;

use crate::base::Position;

/// An identifier together with the position it was written at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id {
    pub name: SmolStr,
    pub pos: Position,
}

impl Id {
    pub fn new(name: impl Into<SmolStr>, pos: Position) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A complete parsed language: every category, association and define seen,
/// in source order.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub categories: Vec<Category>,
    pub associations: Vec<Association>,
    pub defines: Vec<Define>,
    /// `include "path"` directives, unresolved.
    pub includes: Vec<Include>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the declarations of an included file into this tree.
    pub fn include(&mut self, other: Ast) {
        self.categories.extend(other.categories);
        self.associations.extend(other.associations);
        self.defines.extend(other.defines);
        self.includes.extend(other.includes);
    }

    /// Iterate all assets across all category blocks.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.categories.iter().flat_map(|c| c.assets.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub pos: Position,
    pub path: String,
}

/// `#key: "value"`
#[derive(Debug, Clone, PartialEq)]
pub struct Define {
    pub pos: Position,
    pub key: Id,
    pub value: String,
}

/// `<kind> info: "value"`; the kind is a free identifier such as
/// `user`, `developer`, `modeler`, `assumptions` or `rationale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub pos: Position,
    pub kind: Id,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub pos: Position,
    pub name: Id,
    pub meta: Vec<Meta>,
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub pos: Position,
    pub is_abstract: bool,
    pub name: Id,
    pub parent: Option<Id>,
    pub meta: Vec<Meta>,
    pub attack_steps: Vec<AttackStep>,
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackStepKind {
    All,
    Any,
    Defense,
    Exist,
    NotExist,
}

impl AttackStepKind {
    /// Existence steps (`E` / `!E`) are conditioned on `requires` instead of TTC.
    pub fn is_existence(self) -> bool {
        matches!(self, Self::Exist | Self::NotExist)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Any => "ANY",
            Self::Defense => "DEFENSE",
            Self::Exist => "EXIST",
            Self::NotExist => "NOTEXIST",
        }
    }
}

impl fmt::Display for AttackStepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cia {
    C,
    I,
    A,
}

impl fmt::Display for Cia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cia::C => "C",
            Cia::I => "I",
            Cia::A => "A",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackStep {
    pub pos: Position,
    pub kind: AttackStepKind,
    pub name: Id,
    pub tags: Vec<Id>,
    pub cia: Option<Vec<Cia>>,
    pub ttc: Option<TtcExpr>,
    pub meta: Vec<Meta>,
    pub requires: Option<Requires>,
    pub reaches: Option<Reaches>,
}

/// `<- expr, ...` on an existence step.
#[derive(Debug, Clone, PartialEq)]
pub struct Requires {
    pub pos: Position,
    pub variables: Vec<Variable>,
    pub requires: Vec<Expr>,
}

/// `-> expr, ...` (override) or `+> expr, ...` (inherit).
#[derive(Debug, Clone, PartialEq)]
pub struct Reaches {
    pub pos: Position,
    pub inherits: bool,
    pub variables: Vec<Variable>,
    pub reaches: Vec<Expr>,
}

/// `let name = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub pos: Position,
    pub name: Id,
    pub expr: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtcOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl TtcOp {
    /// Operators whose operands may not be sampled from every distribution.
    pub fn is_restricted(self) -> bool {
        matches!(self, Self::Sub | Self::Div | Self::Pow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TtcExpr {
    pub pos: Position,
    pub kind: TtcExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TtcExprKind {
    Binary {
        op: TtcOp,
        lhs: Box<TtcExpr>,
        rhs: Box<TtcExpr>,
    },
    Func {
        name: Id,
        params: Vec<f64>,
    },
    Number(f64),
}

/// A path expression over fields, variables and attack steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub pos: Position,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `lhs.rhs`
    Step(Box<Expr>, Box<Expr>),
    /// `lhs \/ rhs`
    Union(Box<Expr>, Box<Expr>),
    /// `lhs /\ rhs`
    Intersection(Box<Expr>, Box<Expr>),
    /// `lhs - rhs`
    Difference(Box<Expr>, Box<Expr>),
    /// `e*`
    Transitive(Box<Expr>),
    /// `e[Type]`
    SubType { expr: Box<Expr>, sub_type: Id },
    Id(Id),
    /// `name()`
    Call(Id),
}

impl Expr {
    pub fn new(pos: Position, kind: ExprKind) -> Self {
        Self { pos, kind }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Step(lhs, rhs) => write!(f, "{lhs}.{rhs}"),
            ExprKind::Union(lhs, rhs) => write!(f, "({lhs} \\/ {rhs})"),
            ExprKind::Intersection(lhs, rhs) => write!(f, "({lhs} /\\ {rhs})"),
            ExprKind::Difference(lhs, rhs) => write!(f, "({lhs} - {rhs})"),
            ExprKind::Transitive(e) => write!(f, "{e}*"),
            ExprKind::SubType { expr, sub_type } => write!(f, "{expr}[{sub_type}]"),
            ExprKind::Id(id) => write!(f, "{id}"),
            ExprKind::Call(id) => write!(f, "{id}()"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    ZeroOrOne,
    ZeroOrMore,
    One,
    OneOrMore,
}

impl Multiplicity {
    pub fn min(self) -> u32 {
        match self {
            Self::ZeroOrOne | Self::ZeroOrMore => 0,
            Self::One | Self::OneOrMore => 1,
        }
    }

    /// Upper bound; `None` is unbounded.
    pub fn max(self) -> Option<u32> {
        match self {
            Self::ZeroOrOne | Self::One => Some(1),
            Self::ZeroOrMore | Self::OneOrMore => None,
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ZeroOrOne => "0..1",
            Self::ZeroOrMore => "*",
            Self::One => "1",
            Self::OneOrMore => "1..*",
        })
    }
}

/// `Left [leftField] mult <-- Link --> mult [rightField] Right`
///
/// `left_field` names the left asset as seen from the right asset, so it
/// becomes a field *of the right asset*; `right_field` likewise belongs to
/// the left asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub pos: Position,
    pub left_asset: Id,
    pub left_field: Id,
    pub left_mult: Multiplicity,
    pub link_name: Id,
    pub right_mult: Multiplicity,
    pub right_field: Id,
    pub right_asset: Id,
    pub meta: Vec<Meta>,
}

impl Association {
    /// Compact form used in diagnostics.
    pub fn to_short_string(&self) -> String {
        format!(
            "{} [{}] <-- {} --> {} [{}]",
            self.left_asset, self.left_field, self.link_name, self.right_asset, self.right_field
        )
    }
}
