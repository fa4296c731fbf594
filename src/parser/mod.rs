//! Recursive-descent parser for MAL
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → significant Tokens with TokenKind and byte offset
//!     ↓
//! Parser → syntax::Ast (owned tree, one Position per node)
//! ```
//!
//! The parser stops at the first syntax error. Include directives are
//! recorded on the tree; resolving them to files is left to the caller.

#[allow(clippy::module_inception)]
mod parser;

mod error;
pub mod lexer;

pub use error::ParseError;
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{Parser, parse};
