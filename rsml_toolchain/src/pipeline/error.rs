use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::normalizer::NormalizerError;
use crate::validation::ValidationError;

/// Why a line was rejected before evaluation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Lexical analysis failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("Normalization failed: {0}")]
    Normalization(#[from] NormalizerError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected line shape of {length} tokens")]
    UnexpectedShape { length: usize },
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            SyntaxError::Lexical(e) => e.error_code(),
            SyntaxError::Normalization(e) => e.error_code(),
            SyntaxError::Validation(e) => e.error_code(),
            SyntaxError::UnexpectedShape { .. } => codes::evaluation::UNEXPECTED_SHAPE,
        }
    }
}

/// Errors that end an evaluation. None are recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RsmlError {
    #[error("Invalid syntax on line {line}: {source}")]
    InvalidSyntax {
        line: usize,
        #[source]
        source: SyntaxError,
    },

    #[error("Special action '{name}' is not defined")]
    UndefinedAction { name: String },

    #[error("Special action '{name}' failed with code {code}")]
    ActionError { name: String, code: u8 },

    #[error("{message}")]
    UserRaised { message: String },

    #[error("Document of {size} bytes exceeds the maximum size")]
    DocumentTooLarge { size: usize },
}

impl RsmlError {
    pub fn invalid_syntax(line: usize, source: impl Into<SyntaxError>) -> Self {
        Self::InvalidSyntax {
            line,
            source: source.into(),
        }
    }

    pub fn user_raised(message: impl Into<String>) -> Self {
        Self::UserRaised {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            RsmlError::InvalidSyntax { source, .. } => source.error_code(),
            RsmlError::UndefinedAction { .. } => codes::evaluation::UNDEFINED_ACTION,
            RsmlError::ActionError { .. } => codes::evaluation::ACTION_ERROR,
            RsmlError::UserRaised { .. } => codes::evaluation::USER_RAISED,
            RsmlError::DocumentTooLarge { .. } => codes::lexical::DOCUMENT_TOO_LARGE,
        }
    }

    /// One-based source line for syntax errors
    pub fn line(&self) -> Option<usize> {
        match self {
            RsmlError::InvalidSyntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn is_syntax_error(&self) -> bool {
        matches!(self, RsmlError::InvalidSyntax { .. })
    }
}
