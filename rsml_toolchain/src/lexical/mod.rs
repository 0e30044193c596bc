//! Lexical analysis for RSML lines
//!
//! The lexer works one line at a time on the cursor's active buffer and
//! never fails on content: unknown words become `UndefinedToken` and are
//! rejected later by validation. Only the compile-time resource limits
//! (line length, eight tokens per line) produce [`LexerError`].

pub mod analyzer;

use crate::config::compile_time::lexical::*;
use crate::logging::codes;

pub use analyzer::{
    classify_component, create_document_from_tokens, tokenize_line,
    tokenize_logic_path_component, LexerError, LexicalAnalyzer, LexicalMetrics,
};

/// Create a new lexical analyzer
pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

/// Verify lexical error codes are registered (for system startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::LINE_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::DOCUMENT_TOO_LARGE,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_line_length" => MAX_LINE_LENGTH,
        "max_document_size" => MAX_DOCUMENT_SIZE
    );

    Ok(())
}

/// Compile-time lexical limits, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalLimits {
    pub max_line_length: usize,
    pub max_document_size: usize,
    pub line_capacity: usize,
}

pub fn get_lexical_limits() -> LexicalLimits {
    LexicalLimits {
        max_line_length: MAX_LINE_LENGTH,
        max_document_size: MAX_DOCUMENT_SIZE,
        line_capacity: crate::tokens::LINE_CAPACITY,
    }
}

pub fn specification_compliance() -> crate::compliance::SpecificationCompliance {
    crate::compliance::SpecificationCompliance::full(crate::compliance::LANGUAGE_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::TextCursor;
    use crate::tokens::TokenKind;

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_limits_are_consistent() {
        let limits = get_lexical_limits();
        assert!(limits.max_line_length > 0);
        assert!(limits.max_document_size >= limits.max_line_length);
        assert_eq!(limits.line_capacity, 8);
    }

    #[test]
    fn test_analyzer_metrics() {
        let document = "# header\n\n@Void\n-> linux \"a\"\n-> \"b\" junk\n";
        let mut cursor = TextCursor::new(document);
        let mut analyzer = create_analyzer();

        while let Some(range) = cursor.read_line() {
            cursor.stage_line(range);
            analyzer.tokenize_line(&mut cursor).unwrap();
            cursor.swap_buffer();
        }

        let metrics = analyzer.metrics();
        assert_eq!(metrics.lines, 5);
        assert_eq!(metrics.blank_lines, 1);
        assert_eq!(metrics.comment_lines, 1);
        assert_eq!(metrics.special_action_lines, 1);
        assert_eq!(metrics.logic_path_lines, 2);
        assert_eq!(metrics.undefined_tokens, 1);
        assert_eq!(metrics.max_line_length, "-> linux \"a\"".len());

        analyzer.reset();
        assert_eq!(analyzer.metrics().lines, 0);
    }

    #[test]
    fn test_free_function_matches_analyzer() {
        let mut cursor = TextCursor::new("!> fedora \"no\"");
        let line = tokenize_line(&mut cursor).unwrap();
        assert_eq!(line.kind(0), TokenKind::ThrowErrorOperator);
        assert_eq!(line.kind(1), TokenKind::SystemName);
    }
}
