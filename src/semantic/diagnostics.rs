//! Diagnostics: semantic warnings and errors.
//!
//! Diagnostics are buffered in a sorted set while the passes run and only
//! emitted (through `tracing`) when the collector is flushed, so the output
//! order depends on source positions and never on traversal order.

use std::collections::BTreeSet;
use std::fmt;

use crate::base::Position;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A diagnostic message with an optional location.
///
/// Ordering is position (positionless first), then severity, then message.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Diagnostic {
    pub position: Option<Position>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(position: &Position, message: impl Into<String>) -> Self {
        Self {
            position: Some(position.clone()),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(position: &Position, message: impl Into<String>) -> Self {
        Self {
            position: Some(position.clone()),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// An error that is not tied to any source location.
    pub fn global_error(message: impl Into<String>) -> Self {
        Self {
            position: None,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) => write!(f, "{} {}", pos, self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Buffers diagnostics during semantic analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    pending: BTreeSet<Diagnostic>,
    flushed: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic. Identical diagnostics are reported once.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.pending.insert(diagnostic);
    }

    pub fn error(&mut self, position: &Position, message: impl Into<String>) {
        self.add(Diagnostic::error(position, message));
    }

    pub fn warning(&mut self, position: &Position, message: impl Into<String>) {
        self.add(Diagnostic::warning(position, message));
    }

    /// Get the number of errors, flushed or pending.
    pub fn error_count(&self) -> usize {
        self.iter().filter(|d| d.is_error()).count()
    }

    /// Get the number of warnings, flushed or pending.
    pub fn warning_count(&self) -> usize {
        self.iter().filter(|d| !d.is_error()).count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.iter().any(Diagnostic::is_error)
    }

    fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.flushed.iter().chain(self.pending.iter())
    }

    /// Emit every pending diagnostic in sorted order.
    pub fn flush(&mut self) {
        for diagnostic in std::mem::take(&mut self.pending) {
            match diagnostic.severity {
                Severity::Warning => tracing::warn!("{}", diagnostic),
                Severity::Error => tracing::error!("{}", diagnostic),
            }
            self.flushed.push(diagnostic);
        }
    }

    /// Flush, then take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.flush();
        std::mem::take(&mut self.flushed)
    }
}
