//! # mal-core
//!
//! Semantic core of a compiler for the Meta Attack Language: parsing,
//! validation and conversion of a language specification into a typed,
//! bidirectional model graph.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! convert   → Model graph construction, parent-step derivation
//!   ↓
//! model     → Assets, fields, links, attack steps, typed step expressions
//!   ↓
//! semantic  → Scopes, validation passes, diagnostics, distributions
//!   ↓
//! parser    → Logos lexer, recursive-descent parser
//!   ↓
//! syntax    → Syntax tree types
//!   ↓
//! base      → Primitives (Position, LineIndex, TextRange)
//! ```
//!
//! ```ignore
//! let model = mal::compile(source, "lang.mal")?;
//! let computer = model.asset_id("Computer").unwrap();
//! let steal = model.attack_step(computer, "stealSecret").unwrap();
//! for parent in &model[steal].parent_steps {
//!     println!("{}", parent.display(&model));
//! }
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → parser → semantic → model → convert)
// ============================================================================

/// Foundation types: Position, LineIndex, TextRange
pub mod base;

/// Syntax tree produced by the parser
pub mod syntax;

/// Parser: Logos lexer, recursive-descent parser
pub mod parser;

/// Semantic analysis: scopes, passes, diagnostics
pub mod semantic;

/// The resolved model graph
pub mod model;

/// Syntax tree → model graph
pub mod convert;

mod error;

pub use base::{LineIndex, Position, TextRange, TextSize};
pub use convert::{ConvertError, convert};
pub use error::{Error, Result};
pub use model::Model;
pub use parser::{ParseError, parse};
pub use semantic::{Analysis, AnalyzerOptions, Diagnostic, SemanticError, Severity, analyze};
pub use syntax::Ast;

/// Parse, analyze and convert one source file with default options.
pub fn compile(source: &str, file: &str) -> Result<Model> {
    compile_with(source, file, &AnalyzerOptions::default())
}

/// Parse, analyze and convert one source file.
pub fn compile_with(source: &str, file: &str, options: &AnalyzerOptions) -> Result<Model> {
    let ast = parse(source, file)?;
    let analysis = semantic::analyze_with(&ast, options)?;
    tracing::debug!(warnings = analysis.diagnostics.len(), "analysis passed");
    Ok(convert(&ast)?)
}
