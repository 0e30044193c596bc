use rsml_toolchain::config::RuntimeConfigError;
use rsml_toolchain::logging::{codes, Code};
use rsml_toolchain::RsmlError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No .rsml documents found under {}", path.display())]
    NoDocuments { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: RsmlError,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] RuntimeConfigError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    pub fn error_code(&self) -> Code {
        match self {
            CliError::Unreadable { .. } => codes::documents::DOCUMENT_UNREADABLE,
            CliError::NoDocuments { .. } => codes::documents::NO_DOCUMENTS_FOUND,
            CliError::Document { source, .. } => source.error_code(),
            CliError::Output { .. } | CliError::Json(_) => codes::documents::OUTPUT_FAILED,
            CliError::Config(error) => error.error_code(),
            CliError::Logging(_) => codes::system::INITIALIZATION_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_keeps_rsml_code() {
        let error = CliError::Document {
            path: PathBuf::from("a.rsml"),
            source: RsmlError::UndefinedAction {
                name: "Probe".to_string(),
            },
        };
        assert_eq!(error.error_code(), codes::evaluation::UNDEFINED_ACTION);
        assert!(error.to_string().starts_with("a.rsml: "));
    }

    #[test]
    fn test_discovery_codes() {
        let error = CliError::NoDocuments {
            path: PathBuf::from("docs"),
        };
        assert_eq!(error.error_code(), codes::documents::NO_DOCUMENTS_FOUND);
        assert_eq!(error.to_string(), "No .rsml documents found under docs");
    }
}
