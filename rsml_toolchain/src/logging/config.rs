//! Configuration access for logging
//!
//! Buffer sizes and message limits are compile-time constants from the
//! build profile; level and output format are runtime preferences.

use crate::config::compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH};
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

// ============================================================================
// RUNTIME PREFERENCES STORAGE
// ============================================================================

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences. Must run before the first log call to take effect.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Preferences in effect; environment defaults are captured on first access
fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

// ============================================================================
// CONFIGURATION ACCESS FUNCTIONS
// ============================================================================

pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn include_document_context() -> bool {
    get_runtime_preferences().include_document_context
}

/// Maximum number of events a MemoryLogger retains
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

// ============================================================================
// CONFIGURATION VALIDATION
// ============================================================================

pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE > 100_000 {
        return Err(format!("Log buffer size too large: {}", LOG_BUFFER_SIZE));
    }

    if LOG_BUFFER_SIZE < 16 {
        return Err(format!("Log buffer size too small: {}", LOG_BUFFER_SIZE));
    }

    if MAX_LOG_MESSAGE_LENGTH > LOG_BUFFER_SIZE * 64 {
        return Err("Max log message length is out of proportion to the buffer".to_string());
    }

    Ok(())
}

pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration ({}):\n\
         - Log buffer size: {}\n\
         - Max message length: {}\n\
         - Min log level: {:?}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Include document context: {}",
        crate::config::build_info::source_info(),
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level,
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.include_document_context,
    )
}

/// Truncate a message to the compile-time maximum, on a char boundary
pub fn clamp_message(message: &str) -> &str {
    if message.len() <= MAX_LOG_MESSAGE_LENGTH {
        return message;
    }
    let mut end = MAX_LOG_MESSAGE_LENGTH;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_time_constants() {
        assert!(get_error_buffer_size() >= 16);
        assert!(get_max_log_message_length() > 0);
    }

    #[test]
    fn test_clamp_message() {
        assert_eq!(clamp_message("short"), "short");

        let long = "é".repeat(MAX_LOG_MESSAGE_LENGTH);
        let clamped = clamp_message(&long);
        assert!(clamped.len() <= MAX_LOG_MESSAGE_LENGTH);
        assert!(long.starts_with(clamped));
    }

    #[test]
    fn test_summary_mentions_profile() {
        let summary = get_config_summary();
        assert!(summary.contains("Logging Configuration"));
        assert!(summary.contains(crate::config::build_info::profile()));
    }
}
