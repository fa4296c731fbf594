//! Semantic error type

use thiserror::Error;

use super::diagnostics::Diagnostic;

/// Analysis failed; every diagnostic of the run (warnings included) has
/// already been flushed and is carried here for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("there were semantic errors")]
pub struct SemanticError {
    pub diagnostics: Vec<Diagnostic>,
}

impl SemanticError {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}
