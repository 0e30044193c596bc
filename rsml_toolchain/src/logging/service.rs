//! Logging service and logger implementations

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level-filtering front for a logger
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Service built from runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if config::use_structured_logging() {
            Arc::new(StructuredLogger::new(min_level))
        } else {
            Arc::new(ConsoleLogger::new(min_level))
        };

        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }
}

/// Human readable output on stderr
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            eprintln!("{}", event.format());
        }
    }
}

/// JSON lines on stderr so stdout stays free for evaluation results
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.format_json() {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", event.format()),
            }
        }
    }
}

/// In-memory logger for tests, bounded by the compile-time buffer size
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn with_events<R>(&self, f: impl FnOnce(&mut Vec<LogEvent>) -> R) -> R {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut events)
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.with_events(|events| events.clone())
    }

    pub fn clear(&self) {
        self.with_events(|events| events.clear());
    }

    pub fn event_count(&self) -> usize {
        self.with_events(|events| events.len())
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.with_events(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.with_events(|events| events.iter().filter(|e| e.code == code).cloned().collect())
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.with_events(|events| events.iter().any(|e| e.is_error() && e.code == code))
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.with_events(|events| events.iter().any(|e| e.is_info() && e.code == code))
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let max_events = config::get_error_buffer_size();
        self.with_events(|events| {
            if events.len() >= max_events {
                let remove_count = events.len() - max_events + 1;
                events.drain(0..remove_count);
            }
            events.push(event.clone());
        });
    }
}

/// Appends events to a file
pub struct FileLogger {
    file_path: PathBuf,
    min_level: LogLevel,
    structured: bool,
}

impl FileLogger {
    pub fn new<P: AsRef<Path>>(
        file_path: P,
        min_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let path = file_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Fail early when the file is not writable
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            file_path: path,
            min_level,
            structured,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let output = if self.structured {
                event.format_json().unwrap_or_else(|_| event.format())
            } else {
                event.format()
            };

            // Write errors are dropped to avoid logging recursion
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(file, "{}", output);
            }
        }
    }
}

pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Info);

        service.log_event(LogEvent::debug("hidden"));
        service.log_success(codes::success::DOCUMENT_NO_MATCH, "visible");
        service.log_error(codes::evaluation::UNDEFINED_ACTION, "visible");

        assert_eq!(memory.event_count(), 2);
        assert!(memory.has_success_with_code(codes::success::DOCUMENT_NO_MATCH));
        assert!(memory.has_error_with_code(codes::evaluation::UNDEFINED_ACTION));
        assert_eq!(memory.get_errors().len(), 1);
    }

    #[test]
    fn test_memory_logger_is_bounded() {
        let memory = MemoryLogger::new();
        let limit = config::get_error_buffer_size();

        for _ in 0..limit + 5 {
            memory.log(&LogEvent::info("tick"));
        }

        assert_eq!(memory.event_count(), limit);
        memory.clear();
        assert_eq!(memory.event_count(), 0);
    }

    #[test]
    fn test_file_logger_appends_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("rsml.log");
        let logger = FileLogger::new(&path, LogLevel::Debug, true).unwrap();

        logger.log(&LogEvent::error(codes::lexical::LINE_TOO_LONG, "too long"));
        logger.log(&LogEvent::success(codes::success::DOCUMENT_CHECKED, "ok"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"code\":\"E020\""));
    }
}
