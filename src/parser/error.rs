//! Syntax error type

use thiserror::Error;

use crate::base::Position;

/// The first syntax error encountered in a source file.
///
/// MAL parsing does not recover: everything downstream needs a complete
/// tree, so the parser stops at the first unexpected token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position} {message}")]
pub struct ParseError {
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Build an "expected X, found Y" error.
    pub fn expected(position: Position, expected: &[&str], found: &str) -> Self {
        Self::new(
            position,
            format!("expected {}, found {}", join_expected(expected), found),
        )
    }
}

fn join_expected(expected: &[&str]) -> String {
    match expected {
        [] => "(null)".to_string(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
