//! Foundation types for the MAL toolchain.
//!
//! This module provides the source-location primitives used throughout:
//! - [`Position`] - File/line/column location carried by every syntax node
//! - [`LineIndex`] - Byte offset to line/column conversion
//!
//! This module has NO dependencies on other crate modules.

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::Position;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
