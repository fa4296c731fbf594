//! # Semantic Analysis
//!
//! Validates a parsed specification before it is converted into a model:
//! name resolution through scoped symbol tables, the extends hierarchy,
//! TTC distributions and the typing of every `reaches`/`requires` path.
//!
//! Diagnostics are collected per pass and flushed to `tracing` in position
//! order; the caller also receives them in [`Analysis`] or
//! [`SemanticError`].

mod analyzer;
mod diagnostics;
pub mod distributions;
mod error;
mod options;
mod scope;

pub use analyzer::{Analysis, analyze, analyze_with};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity};
pub use distributions::{Distribution, DistributionError};
pub use error::SemanticError;
pub use options::AnalyzerOptions;
pub use scope::{ScopeId, Scopes};
