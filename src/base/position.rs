/// Source positions for syntax nodes and diagnostics.
///
/// Lines and columns are 1-indexed, matching what users see in an editor
/// gutter and what diagnostics print.
use std::fmt;

use smol_str::SmolStr;

/// A position in a MAL source file.
///
/// Ordering is by file, then line, then column, which is the order
/// diagnostics are reported in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub file: SmolStr,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(file: impl Into<SmolStr>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}:{}>", self.file, self.line, self.column)
    }
}
