//! Error and success codes with their classification metadata
//!
//! Every error type in the toolchain maps its variants onto one of these
//! codes through an `error_code()` method, and log events carry the code so
//! consumers can filter and classify without parsing messages.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Configuration error codes
pub mod configuration {
    use super::Code;

    pub const INVALID_RUNTIME_CONFIG: Code = Code::new("ERR010");
    pub const INVALID_LOGGING_CONFIG: Code = Code::new("ERR011");
}

/// Lexer error codes
pub mod lexical {
    use super::Code;

    pub const LINE_TOO_LONG: Code = Code::new("E020");
    pub const TOO_MANY_TOKENS: Code = Code::new("E021");
    pub const DOCUMENT_TOO_LARGE: Code = Code::new("E022");
}

/// Normalizer error codes
pub mod normalization {
    use super::Code;

    pub const EMPTY_LINE: Code = Code::new("E030");
    pub const MALFORMED_SHAPE: Code = Code::new("E031");
    pub const UNEXPECTED_LEADING_TOKEN: Code = Code::new("E032");
}

/// Validator error codes
pub mod validation {
    use super::Code;

    pub const EMPTY_SEQUENCE: Code = Code::new("E040");
    pub const INVALID_COMMENT: Code = Code::new("E041");
    pub const INVALID_SPECIAL_ACTION: Code = Code::new("E042");
    pub const INVALID_ACTION_NAME: Code = Code::new("E043");
    pub const UNRECOGNIZED_START: Code = Code::new("E044");
    pub const INVALID_OPERATOR: Code = Code::new("E045");
    pub const OVERLOAD_MISMATCH: Code = Code::new("E046");
    pub const KEYWORD_TEXT_MISMATCH: Code = Code::new("E047");
    pub const INVALID_SYSTEM_NAME: Code = Code::new("E048");
    pub const INVALID_ARCHITECTURE: Code = Code::new("E049");
    pub const INVALID_COMPARATOR: Code = Code::new("E050");
    pub const INVALID_MAJOR_VERSION: Code = Code::new("E051");
    pub const COMPARATOR_REQUIRES_VERSION: Code = Code::new("E052");
    pub const UNRECOGNIZED_OVERLOAD: Code = Code::new("E053");
}

/// Evaluator error codes
pub mod evaluation {
    use super::Code;

    pub const UNEXPECTED_SHAPE: Code = Code::new("E060");
    pub const UNDEFINED_ACTION: Code = Code::new("E061");
    pub const ACTION_ERROR: Code = Code::new("E062");
    pub const USER_RAISED: Code = Code::new("E063");
    pub const REGISTRATION_REJECTED: Code = Code::new("E064");
}

/// C ABI error codes
pub mod native {
    use super::Code;

    pub const NULL_POINTER: Code = Code::new("E080");
    pub const BUFFER_TOO_SMALL: Code = Code::new("E081");
    pub const INVALID_UTF8: Code = Code::new("E082");
    pub const INVALID_TOKEN: Code = Code::new("E083");
}

/// Host probing error codes
pub mod host {
    use super::Code;

    pub const PROBE_FAILED: Code = Code::new("E090");
    pub const COMMAND_FAILED: Code = Code::new("E091");
    pub const COMMAND_TIMEOUT: Code = Code::new("E092");
    pub const COMMAND_NOT_ALLOWED: Code = Code::new("E093");
    pub const OS_RELEASE_UNREADABLE: Code = Code::new("E094");
}

/// Document discovery and file errors (command line front end)
pub mod documents {
    use super::Code;

    pub const DOCUMENT_UNREADABLE: Code = Code::new("E100");
    pub const NO_DOCUMENTS_FOUND: Code = Code::new("E101");
    pub const OUTPUT_FAILED: Code = Code::new("E102");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const DOCUMENT_MATCHED: Code = Code::new("I010");
    pub const DOCUMENT_NO_MATCH: Code = Code::new("I011");
    pub const DOCUMENT_CHECKED: Code = Code::new("I012");
    pub const HOST_PROBED: Code = Code::new("I020");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

type Entry = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

// (code, category, severity, recoverable, requires_halt, description, action)
const ENTRIES: &[Entry] = &[
    // System
    ("ERR001", "System", Severity::Critical, false, true,
        "Internal toolchain error",
        "Report the failing document and machine descriptor"),
    ("ERR002", "System", Severity::Critical, false, true,
        "Logging or runtime initialization failed",
        "Check logging configuration and environment variables"),
    // Configuration
    ("ERR010", "Configuration", Severity::High, true, false,
        "Runtime configuration could not be loaded",
        "Fix the TOML syntax or path of the runtime configuration"),
    ("ERR011", "Configuration", Severity::High, true, false,
        "Logging configuration rejected",
        "Review RSML_LOGGING_* settings"),
    // Lexical
    ("E020", "Lexical", Severity::High, false, false,
        "Source line exceeds the maximum line length",
        "Split or shorten the line"),
    ("E021", "Lexical", Severity::High, false, false,
        "Line produces more tokens than a line can hold",
        "Remove extra logic path components"),
    ("E022", "Lexical", Severity::High, false, false,
        "Document exceeds the maximum document size",
        "Reduce the document size or rebuild with a larger limit"),
    // Normalization
    ("E030", "Normalization", Severity::High, false, false,
        "Line carries no tokens",
        "Internal pipeline misuse; tokenize the line first"),
    ("E031", "Normalization", Severity::High, false, false,
        "Token sequence matches no known statement shape",
        "Check the statement against the RSML grammar"),
    ("E032", "Normalization", Severity::High, false, false,
        "Line starts with a token that cannot begin a statement",
        "Start the line with '#', '@', '->' or '!>'"),
    // Validation
    ("E040", "Validation", Severity::High, false, false,
        "Empty token sequence", "Provide a non-empty line"),
    ("E041", "Validation", Severity::High, false, false,
        "Malformed comment", "Write comments as '# text'"),
    ("E042", "Validation", Severity::High, false, false,
        "Malformed special action", "Write special actions as '@Name argument'"),
    ("E043", "Validation", Severity::High, false, false,
        "Invalid special action name", "Use Void, ThrowError, EndAll or a registered name"),
    ("E044", "Validation", Severity::High, false, false,
        "Line does not start with a statement token",
        "Start the line with '#', '@', '->' or '!>'"),
    ("E045", "Validation", Severity::High, false, false,
        "Invalid logic path operator", "Use '->' or '!>'"),
    ("E046", "Validation", Severity::High, false, false,
        "Logic path component in the wrong position",
        "Order components as system, comparator, version, architecture, value"),
    ("E047", "Validation", Severity::High, false, false,
        "Keyword token does not carry its keyword text", "Use 'any' or 'defined'"),
    ("E048", "Validation", Severity::High, false, false,
        "Unknown system name",
        "Use windows, osx, linux, freebsd, debian, ubuntu, archlinux or fedora"),
    ("E049", "Validation", Severity::High, false, false,
        "Unknown processor architecture",
        "Use x64, x86, arm64, arm32 or loongarch64"),
    ("E050", "Validation", Severity::High, false, false,
        "Unknown comparator", "Use ==, !=, <, >, <= or >="),
    ("E051", "Validation", Severity::High, false, false,
        "Major version is not an integer", "Write the version as a whole number"),
    ("E052", "Validation", Severity::High, false, false,
        "Comparator used without a concrete version",
        "Follow a comparator with an integer version"),
    ("E053", "Validation", Severity::High, false, false,
        "Unrecognized logic path overload", "Check the number of components"),
    // Evaluation
    ("E060", "Evaluation", Severity::Critical, false, true,
        "Validated line has an unexpected token count",
        "Report the document that triggered this"),
    ("E061", "Evaluation", Severity::High, false, false,
        "Special action is not registered",
        "Register the action before evaluating"),
    ("E062", "Evaluation", Severity::High, false, false,
        "Special action reported an error",
        "Inspect the action callback"),
    ("E063", "Evaluation", Severity::Medium, false, false,
        "Document raised an error for this machine",
        "Read the author-supplied message"),
    ("E064", "Evaluation", Severity::Medium, true, false,
        "Special action or middleware registration rejected",
        "Use a non-reserved name and stay within registry limits"),
    // Native
    ("E080", "Native", Severity::High, true, false,
        "Null pointer passed across the C ABI", "Pass valid pointers"),
    ("E081", "Native", Severity::Medium, true, false,
        "Result buffer too small", "Retry with a larger buffer"),
    ("E082", "Native", Severity::High, true, false,
        "Document is not valid UTF-8", "Encode documents as UTF-8"),
    ("E083", "Native", Severity::High, true, false,
        "Token struct holds an invalid kind or range",
        "Only pass tokens produced by the toolchain"),
    // Host
    ("E090", "Host", Severity::Medium, true, false,
        "Host machine probing failed", "Supply the machine descriptor explicitly"),
    ("E091", "Host", Severity::Medium, true, false,
        "Probe command failed", "Check that the command exists and is executable"),
    ("E092", "Host", Severity::Medium, true, false,
        "Probe command timed out", "Raise command_timeout_ms in the build profile"),
    ("E093", "Host", Severity::High, true, false,
        "Probe command not in the allowed list", "Only whitelisted commands may run"),
    ("E094", "Host", Severity::Low, true, false,
        "/etc/os-release could not be read", "Supply distro fields explicitly"),
    // Documents
    ("E100", "Documents", Severity::High, true, false,
        "Document file could not be read", "Check the path and file permissions"),
    ("E101", "Documents", Severity::Medium, true, false,
        "No .rsml documents under the given directory", "Point at a document or a directory holding .rsml files"),
    ("E102", "Documents", Severity::High, true, false,
        "Result could not be written", "Check the output destination"),
    // Success
    ("I004", "System", Severity::Low, true, false,
        "System initialization completed successfully", "Continue normal operation"),
    ("I010", "Evaluation", Severity::Low, true, false,
        "Document produced a value", "Continue normal operation"),
    ("I011", "Evaluation", Severity::Low, true, false,
        "Document produced no value", "Continue normal operation"),
    ("I012", "Validation", Severity::Low, true, false,
        "Document checked without errors", "Continue normal operation"),
    ("I020", "Host", Severity::Low, true, false,
        "Host machine descriptor collected", "Continue normal operation"),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        ENTRIES
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            configuration::INVALID_RUNTIME_CONFIG,
            lexical::TOO_MANY_TOKENS,
            normalization::MALFORMED_SHAPE,
            validation::UNRECOGNIZED_OVERLOAD,
            evaluation::USER_RAISED,
            native::BUFFER_TOO_SMALL,
            host::COMMAND_TIMEOUT,
            documents::NO_DOCUMENTS_FOUND,
            success::DOCUMENT_MATCHED,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in ENTRIES {
            assert!(seen.insert(entry.0), "duplicate code {}", entry.0);
        }
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
        assert!(!requires_halt("X999"));
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("E048"), "Validation");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt(evaluation::UNEXPECTED_SHAPE.as_str()));
        assert!(!is_recoverable(validation::INVALID_COMPARATOR.as_str()));
    }
}
