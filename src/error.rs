//! Crate-level error type

use thiserror::Error;

use crate::convert::ConvertError;
use crate::parser::ParseError;
use crate::semantic::SemanticError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
