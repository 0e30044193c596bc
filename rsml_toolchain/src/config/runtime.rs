// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationPreferences {
    /// Whether to emit a debug event for every evaluated line
    pub trace_lines: bool,

    /// Whether to emit a success event when a document produces a value
    pub log_matches: bool,

    /// Whether CLI output should include the matched line number
    pub report_line_numbers: bool,
}

impl Default for EvaluationPreferences {
    fn default() -> Self {
        Self {
            trace_lines: env::var("RSML_EVALUATION_TRACE_LINES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_matches: env::var("RSML_EVALUATION_LOG_MATCHES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            report_line_numbers: env::var("RSML_EVALUATION_REPORT_LINE_NUMBERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,

    /// Whether to tag events with the document being evaluated
    pub include_document_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("RSML_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("RSML_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("RSML_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_document_context: env::var("RSML_LOGGING_INCLUDE_DOCUMENT_CONTEXT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RuntimeConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::configuration::INVALID_RUNTIME_CONFIG
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub evaluation: EvaluationPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a runtime configuration; missing sections fall back to env defaults
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Evaluation
    pub const EVALUATION_TRACE_LINES: &str = "RSML_EVALUATION_TRACE_LINES";
    pub const EVALUATION_LOG_MATCHES: &str = "RSML_EVALUATION_LOG_MATCHES";
    pub const EVALUATION_REPORT_LINE_NUMBERS: &str = "RSML_EVALUATION_REPORT_LINE_NUMBERS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "RSML_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "RSML_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "RSML_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_DOCUMENT_CONTEXT: &str = "RSML_LOGGING_INCLUDE_DOCUMENT_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_sections() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [logging]
            min_log_level = "debug"
            use_structured_logging = true
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert!(config.logging.use_structured_logging);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = RuntimeConfig::from_toml_str("[logging]\nmin_log_level = \"loud\"");
        assert_matches!(result, Err(RuntimeConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[evaluation]\ntrace_lines = true").unwrap();

        let config = RuntimeConfig::from_file(file.path()).unwrap();
        assert!(config.evaluation.trace_lines);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = RuntimeConfig::from_file("/nonexistent/rsml.toml");
        assert_matches!(result, Err(RuntimeConfigError::Io { ref path, .. }) if path.contains("rsml.toml"));
    }
}
