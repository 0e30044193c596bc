//! Error types for line normalization

use crate::logging::codes;
use crate::tokens::TokenKind;
use thiserror::Error;

pub type NormalizerResult<T> = Result<T, NormalizerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizerError {
    /// Line holds no tokens at all (not even a terminator)
    #[error("Cannot normalize an empty line")]
    EmptyLine,

    /// Token count has no canonical form for the leading token
    #[error("Malformed {leading} line: {length} tokens has no canonical shape")]
    MalformedShape { leading: TokenKind, length: usize },

    /// Line does not start with a terminator, comment, special action or operator
    #[error("Line cannot start with {kind}")]
    UnexpectedLeadingToken { kind: TokenKind },
}

impl NormalizerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            NormalizerError::EmptyLine => codes::normalization::EMPTY_LINE,
            NormalizerError::MalformedShape { .. } => codes::normalization::MALFORMED_SHAPE,
            NormalizerError::UnexpectedLeadingToken { .. } => {
                codes::normalization::UNEXPECTED_LEADING_TOKEN
            }
        }
    }
}
