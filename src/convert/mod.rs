//! # Model Conversion
//!
//! Builds the [`Model`] graph from a syntax tree that passed analysis:
//!
//! ```text
//! categories → assets → super assets → links/fields → attack steps
//!   → requires/reaches paths → parent steps
//! ```
//!
//! Path typing follows the analyzer, so every lookup here is expected to
//! succeed. A failed lookup means the tree was not analyzed (or the two
//! disagree) and is reported as a [`ConvertError`].

mod paths;
mod reverse;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;

use crate::base::Position;
use crate::model::{
    Asset, AssetId, AttackStep, AttackStepId, Category, CategoryId, Cia, Field, FieldId, Link,
    LinkId, Meta, Model, TtcExpr, VariableId,
};
use crate::semantic::{Distribution, DistributionError};
use crate::syntax::{self, Ast, TtcExprKind, TtcOp};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("asset '{0}' is not defined")]
    UnknownAsset(SmolStr),

    #[error("field '{field}' is not defined for asset '{asset}'")]
    UnknownField { asset: SmolStr, field: SmolStr },

    #[error("attack step '{step}' is not defined for asset '{asset}'")]
    UnknownAttackStep { asset: SmolStr, step: SmolStr },

    #[error("variable '{variable}' is not defined for asset '{asset}'")]
    UnknownVariable { asset: SmolStr, variable: SmolStr },

    #[error("types '{left}' and '{right}' have no common ancestor")]
    NoCommonAncestor { left: SmolStr, right: SmolStr },

    #[error("'{0}' does not end in an attack step")]
    NotAttackStep(String),

    #[error("variable '{0}' refers to itself")]
    VariableCycle(SmolStr),

    #[error("cannot reverse {0}")]
    Irreversible(&'static str),

    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Convert an analyzed syntax tree into a model graph.
pub fn convert(ast: &Ast) -> Result<Model, ConvertError> {
    Converter::new(ast).run()
}

/// A variable binding found for a name, and where to resolve its body.
#[derive(Debug, Clone, Copy)]
struct Binding<'a> {
    variable: &'a syntax::Variable,
    asset: AssetId,
    /// Step-local `let`s visible to the body; `None` for asset variables.
    locals: Option<&'a [syntax::Variable]>,
}

struct Converter<'a> {
    ast: &'a Ast,
    model: Model,
    /// Declaring syntax node of every model asset.
    sources: Vec<&'a syntax::Asset>,
    /// Converted variables keyed by the position of their name.
    variables: FxHashMap<Position, VariableId>,
    converting: FxHashSet<Position>,
    reversed: FxHashMap<VariableId, VariableId>,
}

impl<'a> Converter<'a> {
    fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            model: Model::new(),
            sources: Vec::new(),
            variables: FxHashMap::default(),
            converting: FxHashSet::default(),
            reversed: FxHashMap::default(),
        }
    }

    fn run(mut self) -> Result<Model, ConvertError> {
        self.convert_defines();
        self.convert_categories();
        self.convert_super_assets()?;
        self.convert_links()?;
        self.convert_attack_steps()?;
        self.convert_paths()?;
        self.convert_parent_steps()?;
        tracing::debug!(
            assets = self.model.assets.len(),
            attack_steps = self.model.attack_steps.len(),
            links = self.model.links.len(),
            "converted model"
        );
        Ok(self.model)
    }

    fn convert_defines(&mut self) {
        for define in &self.ast.defines {
            self.model
                .defines
                .insert(define.key.name.clone(), define.value.clone());
        }
    }

    /// Category blocks sharing a name become one category.
    fn convert_categories(&mut self) {
        let ast = self.ast;
        for category in &ast.categories {
            let id = match self.model.category_index.get(&category.name.name) {
                Some(id) => *id,
                None => {
                    let id = CategoryId::new(self.model.categories.len());
                    self.model.categories.push(Category {
                        name: category.name.name.clone(),
                        meta: Meta::new(),
                        assets: Vec::new(),
                    });
                    self.model
                        .category_index
                        .insert(category.name.name.clone(), id);
                    id
                }
            };
            extend_meta(&mut self.model.categories[id.index()].meta, &category.meta);

            for asset in &category.assets {
                let asset_id = AssetId::new(self.model.assets.len());
                self.model.assets.push(Asset {
                    name: asset.name.name.clone(),
                    is_abstract: asset.is_abstract,
                    category: id,
                    super_asset: None,
                    meta: meta(&asset.meta),
                    fields: IndexMap::new(),
                    attack_steps: IndexMap::new(),
                    variables: IndexMap::new(),
                    reverse_variables: Vec::new(),
                });
                self.sources.push(asset);
                self.model.categories[id.index()].assets.push(asset_id);
                self.model
                    .asset_index
                    .insert(asset.name.name.clone(), asset_id);
            }
        }
    }

    fn convert_super_assets(&mut self) -> Result<(), ConvertError> {
        for index in 0..self.sources.len() {
            if let Some(parent) = &self.sources[index].parent {
                let parent = self.asset_id(&parent.name)?;
                self.model.assets[index].super_asset = Some(parent);
            }
        }
        Ok(())
    }

    /// Each association becomes a link and two paired fields; a field is
    /// owned by the asset on its own side and carries the multiplicity
    /// written next to its name.
    fn convert_links(&mut self) -> Result<(), ConvertError> {
        let ast = self.ast;
        for association in &ast.associations {
            let link = LinkId::new(self.model.links.len());
            let left_asset = self.asset_id(&association.left_asset.name)?;
            let right_asset = self.asset_id(&association.right_asset.name)?;
            let left_field = FieldId::new(self.model.fields.len());
            let right_field = FieldId::new(left_field.index() + 1);

            self.model.fields.push(Field {
                name: association.right_field.name.clone(),
                asset: left_asset,
                min: association.right_mult.min(),
                max: association.right_mult.max(),
                link,
                target: right_field,
            });
            self.model.fields.push(Field {
                name: association.left_field.name.clone(),
                asset: right_asset,
                min: association.left_mult.min(),
                max: association.left_mult.max(),
                link,
                target: left_field,
            });
            self.model.assets[left_asset.index()]
                .fields
                .insert(association.right_field.name.clone(), left_field);
            self.model.assets[right_asset.index()]
                .fields
                .insert(association.left_field.name.clone(), right_field);

            self.model.links.push(Link {
                name: association.link_name.name.clone(),
                meta: meta(&association.meta),
                left_field,
                right_field,
            });
        }
        Ok(())
    }

    fn convert_attack_steps(&mut self) -> Result<(), ConvertError> {
        for index in 0..self.sources.len() {
            let source = self.sources[index];
            let asset = AssetId::new(index);
            for step in &source.attack_steps {
                let ttc = step.ttc.as_ref().map(convert_ttc).transpose()?;
                let id = AttackStepId::new(self.model.attack_steps.len());
                self.model.attack_steps.push(AttackStep {
                    name: step.name.name.clone(),
                    kind: step.kind,
                    asset,
                    inherits_reaches: step.reaches.as_ref().is_some_and(|r| r.inherits),
                    cia: step.cia.as_deref().map(convert_cia),
                    ttc,
                    tags: step.tags.iter().map(|t| t.name.clone()).collect(),
                    meta: meta(&step.meta),
                    requires: Vec::new(),
                    reaches: Vec::new(),
                    parent_steps: Vec::new(),
                });
                self.model.assets[index]
                    .attack_steps
                    .insert(step.name.name.clone(), id);
            }
        }
        Ok(())
    }

    fn convert_paths(&mut self) -> Result<(), ConvertError> {
        for index in 0..self.sources.len() {
            let source = self.sources[index];
            let asset = AssetId::new(index);
            for step in &source.attack_steps {
                let Some(id) = self.model.assets[index]
                    .attack_steps
                    .get(&step.name.name)
                    .copied()
                else {
                    continue;
                };
                if let Some(requires) = &step.requires {
                    let locals = Some(requires.variables.as_slice());
                    for expr in &requires.requires {
                        let converted = self.convert_to_asset(expr, asset, None, locals)?;
                        self.model.attack_steps[id.index()].requires.push(converted);
                    }
                }
                if let Some(reaches) = &step.reaches {
                    let locals = Some(reaches.variables.as_slice());
                    for expr in &reaches.reaches {
                        let converted = self.convert_to_step(expr, asset, locals)?;
                        self.model.attack_steps[id.index()].reaches.push(converted);
                    }
                }
            }
        }
        Ok(())
    }

    fn asset_id(&self, name: &SmolStr) -> Result<AssetId, ConvertError> {
        self.model
            .asset_id(name)
            .ok_or_else(|| ConvertError::UnknownAsset(name.clone()))
    }
}

fn meta(metas: &[syntax::Meta]) -> Meta {
    let mut converted = Meta::new();
    extend_meta(&mut converted, metas);
    converted
}

fn extend_meta(converted: &mut Meta, metas: &[syntax::Meta]) {
    for m in metas {
        converted.insert(m.kind.name.clone(), m.value.clone());
    }
}

fn convert_cia(letters: &[syntax::Cia]) -> Cia {
    let mut cia = Cia::default();
    for letter in letters {
        match letter {
            syntax::Cia::C => cia.confidentiality = true,
            syntax::Cia::I => cia.integrity = true,
            syntax::Cia::A => cia.availability = true,
        }
    }
    cia
}

fn convert_ttc(expr: &syntax::TtcExpr) -> Result<TtcExpr, ConvertError> {
    Ok(match &expr.kind {
        TtcExprKind::Binary { op, lhs, rhs } => {
            let lhs = Box::new(convert_ttc(lhs)?);
            let rhs = Box::new(convert_ttc(rhs)?);
            match op {
                TtcOp::Add => TtcExpr::Add(lhs, rhs),
                TtcOp::Sub => TtcExpr::Sub(lhs, rhs),
                TtcOp::Mul => TtcExpr::Mul(lhs, rhs),
                TtcOp::Div => TtcExpr::Div(lhs, rhs),
                TtcOp::Pow => TtcExpr::Pow(lhs, rhs),
            }
        }
        TtcExprKind::Func { name, params } => {
            TtcExpr::Distribution(Distribution::new(name.as_str(), params)?)
        }
        TtcExprKind::Number(value) => TtcExpr::Number(*value),
    })
}
