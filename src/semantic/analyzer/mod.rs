//! Semantic analyzer
//!
//! Runs the validation passes over a syntax tree in a fixed order:
//!
//! ```text
//! defines → categories → assets → metadata
//!   → extends (abort) → extends cycles (abort) → abstract
//!   → steps → CIA → TTC → fields
//!   → reaches/requires (abort on any error so far)
//!   → associations (abort) → unused
//! ```
//!
//! Passes marked "abort" stop the run because the passes after them rely on
//! the invariant they establish (every super-asset exists, the extends
//! relation is acyclic, every path expression resolves). All other errors
//! are accumulated so one run reports as many problems as possible.

mod declarations;
mod fields;
mod reaches;
mod steps;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::error::SemanticError;
use super::options::AnalyzerOptions;
use super::scope::{ScopeId, Scopes};
use crate::base::Position;
use crate::syntax::{Asset, Association, AttackStep, Id, Variable};

/// A successful analysis; only warnings can be present.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
}

/// Analyze a syntax tree with default options.
pub fn analyze(ast: &crate::syntax::Ast) -> Result<Analysis, SemanticError> {
    analyze_with(ast, &AnalyzerOptions::default())
}

/// Analyze a syntax tree.
pub fn analyze_with(
    ast: &crate::syntax::Ast,
    options: &AnalyzerOptions,
) -> Result<Analysis, SemanticError> {
    let mut analyzer = Analyzer::new(ast, options);
    let completed = analyzer.run().is_ok();
    let failed = !completed
        || analyzer.diagnostics.has_errors()
        || (options.warnings_as_errors && analyzer.diagnostics.warning_count() > 0);
    let diagnostics = analyzer.diagnostics.take();
    if failed {
        tracing::debug!(
            errors = diagnostics.iter().filter(|d| d.is_error()).count(),
            "semantic analysis failed"
        );
        Err(SemanticError { diagnostics })
    } else {
        Ok(Analysis { diagnostics })
    }
}

/// Raised by a pass whose failure makes the remaining passes meaningless.
#[derive(Debug)]
pub(super) struct Abort;

type PassResult = Result<(), Abort>;

/// Which named end of an association a field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum End {
    Left,
    Right,
}

/// A field as seen from one asset: one named end of an association.
#[derive(Debug, Clone, Copy)]
pub(super) struct FieldRef<'a> {
    pub index: usize,
    pub association: &'a Association,
    pub end: End,
}

impl<'a> FieldRef<'a> {
    /// The field's name as declared.
    pub fn id(&self) -> &'a Id {
        match self.end {
            End::Left => &self.association.left_field,
            End::Right => &self.association.right_field,
        }
    }

    /// The asset the field leads to.
    pub fn target(&self) -> &'a Id {
        match self.end {
            End::Left => &self.association.left_asset,
            End::Right => &self.association.right_asset,
        }
    }
}

/// A variable binding and the asset that declares it.
#[derive(Debug, Clone, Copy)]
pub(super) struct VariableRef<'a> {
    pub variable: &'a Variable,
    pub asset: &'a Asset,
}

/// State of one analysis run, threaded through every pass.
pub(super) struct Analyzer<'a> {
    ast: &'a crate::syntax::Ast,
    options: &'a AnalyzerOptions,
    diagnostics: DiagnosticCollector,
    /// Assets by name; the first declaration wins.
    assets: IndexMap<SmolStr, &'a Asset>,
    steps: Scopes<&'a AttackStep>,
    step_scopes: FxHashMap<SmolStr, ScopeId>,
    fields: Scopes<FieldRef<'a>>,
    field_scopes: FxHashMap<SmolStr, ScopeId>,
    variables: Scopes<VariableRef<'a>>,
    variable_scopes: FxHashMap<SmolStr, ScopeId>,
    /// Reference counts keyed by the position of the variable's name.
    variable_references: IndexMap<Position, (&'a Variable, u32)>,
    /// References to each association, left end then right end.
    field_references: Vec<[u32; 2]>,
    /// Variables currently being resolved, in entry order.
    evaluating: IndexMap<Position, &'a Variable>,
}

impl<'a> Analyzer<'a> {
    fn new(ast: &'a crate::syntax::Ast, options: &'a AnalyzerOptions) -> Self {
        Self {
            ast,
            options,
            diagnostics: DiagnosticCollector::new(),
            assets: IndexMap::new(),
            steps: Scopes::new(),
            step_scopes: FxHashMap::default(),
            fields: Scopes::new(),
            field_scopes: FxHashMap::default(),
            variables: Scopes::new(),
            variable_scopes: FxHashMap::default(),
            variable_references: IndexMap::new(),
            field_references: vec![[0, 0]; ast.associations.len()],
            evaluating: IndexMap::new(),
        }
    }

    fn run(&mut self) -> PassResult {
        tracing::debug!("checking declarations");
        self.check_defines();
        self.check_categories();
        self.check_assets();
        self.check_metas();
        self.check_extends()?;
        self.check_parents()?;
        self.check_abstract();

        tracing::debug!(assets = self.assets.len(), "checking attack steps and fields");
        self.check_steps();
        self.check_cia();
        self.check_ttc();
        self.check_fields();

        tracing::debug!("checking reaches and requires");
        self.check_reaches()?;
        self.check_associations()?;
        if self.options.check_unused {
            self.check_unused();
        }
        Ok(())
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    fn error(&mut self, position: &Position, message: impl Into<String>) {
        self.diagnostics.error(position, message);
    }

    fn warning(&mut self, position: &Position, message: impl Into<String>) {
        self.diagnostics.warning(position, message);
    }

    // ========================================================================
    // Asset hierarchy
    // ========================================================================

    /// Look up an asset, reporting it if undefined.
    fn get_asset(&mut self, name: &Id) -> Option<&'a Asset> {
        let found = self.assets.get(&name.name).copied();
        if found.is_none() {
            self.error(&name.pos, format!("Asset '{}' not defined", name));
        }
        found
    }

    fn super_asset(&self, asset: &Asset) -> Option<&'a Asset> {
        asset
            .parent
            .as_ref()
            .and_then(|p| self.assets.get(&p.name).copied())
    }

    /// The asset and all its ancestors, oldest ancestor first.
    fn super_chain(&self, asset: &'a Asset) -> Vec<&'a Asset> {
        let mut chain = vec![asset];
        let mut seen: IndexSet<&str> = IndexSet::new();
        seen.insert(asset.name.as_str());
        let mut current = asset;
        while let Some(parent) = self.super_asset(current) {
            if !seen.insert(parent.name.as_str()) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Whether `child` is `parent` or extends it, directly or not.
    fn is_sub_type(&self, child: &'a Asset, parent: &Asset) -> bool {
        self.super_chain(child)
            .iter()
            .any(|a| a.name.name == parent.name.name)
    }

    /// Least upper bound of two assets in the extends hierarchy.
    fn least_upper_bound(&self, left: &'a Asset, right: &'a Asset) -> Option<&'a Asset> {
        let (mut left, mut right) = (left, right);
        loop {
            if self.is_sub_type(right, left) {
                return Some(left);
            }
            if self.is_sub_type(left, right) {
                return Some(right);
            }
            let next_left = self.super_asset(left);
            let next_right = self.super_asset(right);
            if next_left.is_none() && next_right.is_none() {
                return None;
            }
            left = next_left.unwrap_or(left);
            right = next_right.unwrap_or(right);
        }
    }
}
