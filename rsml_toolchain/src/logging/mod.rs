//! Global logging module for the RSML toolchain
//!
//! Logging is silent until `init_global_logging` (or the `_with_service`
//! variant) runs, so library users that never initialise it pay only an
//! atomic load per log call.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, FileLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static DOCUMENT_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(logging_service.clone())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a caller-built service (file loggers, tests)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether an event at `level` would reach a logger
pub fn enabled(level: LogLevel) -> bool {
    try_get_global_logger().is_some_and(|logger| logger.should_log(level))
}

// ============================================================================
// DOCUMENT CONTEXT MANAGEMENT
// ============================================================================

pub fn set_document_context(name: impl Into<String>) {
    DOCUMENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(name.into()));
}

pub fn clear_document_context() {
    DOCUMENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = None);
}

/// Run `f` with every event on this thread tagged with `name`
pub fn with_document_context<F, R>(name: impl Into<String>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = DOCUMENT_CONTEXT.with(|ctx| ctx.borrow_mut().replace(name.into()));
    let result = f();
    DOCUMENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

pub fn get_current_document_context() -> Option<String> {
    DOCUMENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Attach the thread's document context, when enabled
pub fn attach_document_context(event: LogEvent) -> LogEvent {
    if !config::include_document_context() {
        return event;
    }
    match get_current_document_context() {
        Some(document) => event.with_context("document", &document),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn dispatch(mut event: LogEvent, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        logger.log_event(attach_document_context(event));
    }
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch(event, context);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::success(code, message), context);
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::info(message), context);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::warning(message), context);
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::debug(message), context);
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Error logging that falls back to stderr when logging is not initialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_document_context(LogEvent::error(code, message)));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}
