//! Return codes of the exported functions and the internal error they map from

use rsml_toolchain::lexical::LexerError;
use rsml_toolchain::logging::{codes, Code};
use rsml_toolchain::normalizer::NormalizerError;
use rsml_toolchain::pipeline::RsmlError;
use std::os::raw::c_int;

/// `rsml_normalize_line` / `rsml_tokenize_line` codes
pub mod line {
    use std::os::raw::c_int;

    pub const OK: c_int = 0;
    pub const NULL_POINTER: c_int = -1;
    pub const EMPTY_LINE: c_int = -2;
    pub const INTERNAL_ERROR: c_int = -3;
    pub const TOO_MANY_TOKENS: c_int = -4;
    pub const MALFORMED_LINE: c_int = -5;
    pub const INVALID_TOKEN: c_int = -6;
}

/// `rsml_evaluate_document` / `rsml_evaluator_evaluate` codes
pub mod evaluation {
    use std::os::raw::c_int;

    /// Evaluation failed or the result buffer is too small
    pub const ERROR: c_int = -1;
    pub const NO_MATCH: c_int = 0;
    pub const MATCH: c_int = 1;
}

/// Returned by the buffer-filling metadata exports
pub const BUFFER_TOO_SMALL: c_int = -1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FfiError {
    #[error("Null pointer argument")]
    NullPointer,

    #[error("Input is not valid UTF-8")]
    InvalidUtf8,

    #[error("Unknown token kind {kind}")]
    InvalidTokenKind { kind: u8 },

    #[error("Token range {start}..{end} is reversed")]
    InvalidTokenRange { start: i32, end: i32 },

    #[error("Buffer of {available} bytes cannot hold {needed}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Normalization(#[from] NormalizerError),

    #[error(transparent)]
    Evaluation(#[from] RsmlError),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Panic inside {function}")]
    Panic { function: &'static str },
}

impl FfiError {
    pub fn error_code(&self) -> Code {
        match self {
            FfiError::NullPointer => codes::native::NULL_POINTER,
            FfiError::InvalidUtf8 => codes::native::INVALID_UTF8,
            FfiError::InvalidTokenKind { .. } | FfiError::InvalidTokenRange { .. } => {
                codes::native::INVALID_TOKEN
            }
            FfiError::BufferTooSmall { .. } => codes::native::BUFFER_TOO_SMALL,
            FfiError::Lexer(error) => error.error_code(),
            FfiError::Normalization(error) => error.error_code(),
            FfiError::Evaluation(error) => error.error_code(),
            FfiError::Serialization(_) | FfiError::Panic { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Status for the line-level exports
    pub fn line_status(&self) -> c_int {
        match self {
            FfiError::NullPointer => line::NULL_POINTER,
            FfiError::InvalidTokenKind { .. } | FfiError::InvalidTokenRange { .. } => {
                line::INVALID_TOKEN
            }
            FfiError::Normalization(NormalizerError::EmptyLine) => line::EMPTY_LINE,
            FfiError::Normalization(_) => line::MALFORMED_LINE,
            FfiError::Lexer(LexerError::TooManyTokens { .. }) => line::TOO_MANY_TOKENS,
            _ => line::INTERNAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsml_toolchain::tokens::TokenKind;

    #[test]
    fn test_line_status_mapping() {
        assert_eq!(FfiError::NullPointer.line_status(), line::NULL_POINTER);
        assert_eq!(
            FfiError::from(NormalizerError::EmptyLine).line_status(),
            line::EMPTY_LINE
        );
        assert_eq!(
            FfiError::from(NormalizerError::UnexpectedLeadingToken {
                kind: TokenKind::SystemName
            })
            .line_status(),
            line::MALFORMED_LINE
        );
        assert_eq!(
            FfiError::from(LexerError::TooManyTokens { count: 9 }).line_status(),
            line::TOO_MANY_TOKENS
        );
        assert_eq!(
            FfiError::Panic { function: "test" }.line_status(),
            line::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FfiError::InvalidUtf8.error_code(), codes::native::INVALID_UTF8);
        assert_eq!(
            FfiError::InvalidTokenKind { kind: 99 }.error_code(),
            codes::native::INVALID_TOKEN
        );
        assert_eq!(
            FfiError::from(RsmlError::UndefinedAction { name: "X".into() }).error_code(),
            codes::evaluation::UNDEFINED_ACTION
        );
    }
}
