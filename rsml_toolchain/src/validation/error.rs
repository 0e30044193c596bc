//! Error types for line validation

use crate::logging::codes;
use crate::tokens::TokenKind;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Grammar or vocabulary violation found in one normalized line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Empty token sequence")]
    EmptySequence,

    #[error("Comment must be a symbol followed by text, found {length} tokens")]
    InvalidComment { length: usize },

    #[error("Special action must be symbol, name and argument, found {length} tokens")]
    InvalidSpecialAction { length: usize },

    #[error("Invalid special action name '{name}'")]
    InvalidActionName { name: String },

    #[error("Line cannot start with {kind}")]
    UnrecognizedStart { kind: TokenKind },

    #[error("Invalid operator '{text}'")]
    InvalidOperator { text: String },

    #[error("Expected {expected} at position {position}, found {found}")]
    OverloadMismatch {
        position: usize,
        expected: &'static str,
        found: TokenKind,
    },

    #[error("{kind} must read '{expected}', found '{text}'")]
    KeywordTextMismatch {
        kind: TokenKind,
        expected: &'static str,
        text: String,
    },

    #[error("Unknown system name '{name}'")]
    InvalidSystemName { name: String },

    #[error("Unknown architecture '{name}'")]
    InvalidArchitecture { name: String },

    #[error("Invalid comparator '{text}'")]
    InvalidComparator { text: String },

    #[error("Major version '{text}' is not a 32-bit integer")]
    InvalidMajorVersion { text: String },

    #[error("A comparator must be followed by a major version, found {found}")]
    ComparatorRequiresVersion { found: TokenKind },

    #[error("Unrecognized logic path overload of {length} tokens")]
    UnrecognizedOverload { length: usize },
}

impl ValidationError {
    pub fn error_code(&self) -> crate::logging::Code {
        use codes::validation::*;
        match self {
            ValidationError::EmptySequence => EMPTY_SEQUENCE,
            ValidationError::InvalidComment { .. } => INVALID_COMMENT,
            ValidationError::InvalidSpecialAction { .. } => INVALID_SPECIAL_ACTION,
            ValidationError::InvalidActionName { .. } => INVALID_ACTION_NAME,
            ValidationError::UnrecognizedStart { .. } => UNRECOGNIZED_START,
            ValidationError::InvalidOperator { .. } => INVALID_OPERATOR,
            ValidationError::OverloadMismatch { .. } => OVERLOAD_MISMATCH,
            ValidationError::KeywordTextMismatch { .. } => KEYWORD_TEXT_MISMATCH,
            ValidationError::InvalidSystemName { .. } => INVALID_SYSTEM_NAME,
            ValidationError::InvalidArchitecture { .. } => INVALID_ARCHITECTURE,
            ValidationError::InvalidComparator { .. } => INVALID_COMPARATOR,
            ValidationError::InvalidMajorVersion { .. } => INVALID_MAJOR_VERSION,
            ValidationError::ComparatorRequiresVersion { .. } => COMPARATOR_REQUIRES_VERSION,
            ValidationError::UnrecognizedOverload { .. } => UNRECOGNIZED_OVERLOAD,
        }
    }

    pub(crate) fn mismatch(position: usize, expected: &'static str, found: TokenKind) -> Self {
        Self::OverloadMismatch {
            position,
            expected,
            found,
        }
    }
}

/// Validation failure inside a multi-line token buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {error}")]
pub struct BufferValidationError {
    /// Zero-based index of the failing line within the buffer
    pub line: usize,
    #[source]
    pub error: ValidationError,
}
