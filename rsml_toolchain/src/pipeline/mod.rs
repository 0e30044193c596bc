//! Whole-document entry points
//!
//! Evaluation lives in [`crate::evaluation`]; this module adds the
//! non-evaluating passes used by tooling: checking a document, rebuilding it
//! with canonical spacing, and dumping its tokens.

mod error;

pub use error::{RsmlError, SyntaxError};

use crate::config::compile_time::lexical::MAX_DOCUMENT_SIZE;
use crate::cursor::TextCursor;
use crate::evaluation::evaluator::prepare_line;
use crate::evaluation::{EvaluationResult, Evaluator};
use crate::lexical::{create_document_from_tokens, LexicalAnalyzer, LexicalMetrics};
use crate::logging::codes;
use crate::machine::MachineDescriptor;
use crate::normalizer::normalize_line;
use crate::tokens::{TokenKind, TextRange};
use crate::validation::validate_line;
use crate::{log_error, log_success};
use serde::Serialize;

/// Line counts of a document that passed checking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub special_action_lines: usize,
    pub logic_path_lines: usize,
}

/// One token of a tokenized line, with its text resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub kind: TokenKind,
    /// Byte range within the line; `None` for synthesized tokens
    pub range: Option<(usize, usize)>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedLine {
    /// One-based line number
    pub number: usize,
    pub text: String,
    pub tokens: Vec<TokenInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedDocument {
    pub lines: Vec<TokenizedLine>,
    pub metrics: LexicalMetrics,
}

fn check_size(text: &str) -> Result<(), RsmlError> {
    if text.len() > MAX_DOCUMENT_SIZE {
        let error = RsmlError::DocumentTooLarge { size: text.len() };
        log_error!(error.error_code(), "Document exceeds maximum size",
            "size" => text.len(),
            "limit" => MAX_DOCUMENT_SIZE
        );
        return Err(error);
    }
    Ok(())
}

/// Call `visit` with the one-based number and range of every line
fn for_each_line<F>(text: &str, mut visit: F) -> Result<(), RsmlError>
where
    F: FnMut(&mut TextCursor<'_>, usize, TextRange) -> Result<(), RsmlError>,
{
    let mut cursor = TextCursor::new(text);
    let mut number = 0;
    while let Some(range) = cursor.read_line() {
        number += 1;
        visit(&mut cursor, number, range)?;
        if cursor.active() == crate::cursor::ActiveBuffer::Secondary {
            cursor.swap_buffer();
        }
    }
    Ok(())
}

/// Lex, normalize and validate every line without evaluating anything
pub fn check_document(text: &str) -> Result<DocumentSummary, RsmlError> {
    check_size(text)?;
    let mut summary = DocumentSummary::default();

    for_each_line(text, |cursor, number, range| {
        summary.lines += 1;
        if cursor.slice(range).trim().is_empty() {
            summary.blank_lines += 1;
            return Ok(());
        }

        cursor.stage_line(range);
        let line = prepare_line(cursor).map_err(|e| RsmlError::invalid_syntax(number, e))?;
        match line.kind(0) {
            TokenKind::CommentSymbol => summary.comment_lines += 1,
            TokenKind::SpecialActionSymbol => summary.special_action_lines += 1,
            TokenKind::ReturnOperator | TokenKind::ThrowErrorOperator => {
                summary.logic_path_lines += 1
            }
            _ => summary.blank_lines += 1,
        }
        Ok(())
    })?;

    log_success!(codes::success::DOCUMENT_CHECKED, "Document checked",
        "lines" => summary.lines,
        "logic_paths" => summary.logic_path_lines
    );
    Ok(summary)
}

/// Rebuild every line with single spacing. Blank lines are kept; the
/// document is checked first so invalid input is never rewritten.
pub fn format_document(text: &str) -> Result<String, RsmlError> {
    check_size(text)?;
    let mut formatted = String::with_capacity(text.len());

    for_each_line(text, |cursor, number, range| {
        if cursor.slice(range).trim().is_empty() {
            formatted.push('\n');
            return Ok(());
        }

        cursor.stage_line(range);
        let raw = crate::lexical::tokenize_line(cursor)
            .map_err(|e| RsmlError::invalid_syntax(number, e))?;

        let mut canonical = raw;
        normalize_line(&mut canonical).map_err(|e| RsmlError::invalid_syntax(number, e))?;
        validate_line(&canonical, cursor.text())
            .map_err(|e| RsmlError::invalid_syntax(number, e))?;

        formatted.push_str(&create_document_from_tokens(&raw, cursor.text()));
        Ok(())
    })?;

    Ok(formatted)
}

/// Lex every non-blank line, keeping raw (un-normalized) tokens
pub fn tokenize_document(text: &str) -> Result<TokenizedDocument, RsmlError> {
    check_size(text)?;
    let mut analyzer = LexicalAnalyzer::new();
    let mut lines = Vec::new();

    for_each_line(text, |cursor, number, range| {
        if cursor.slice(range).trim().is_empty() {
            return Ok(());
        }

        cursor.stage_line(range);
        let line = analyzer
            .tokenize_line(cursor)
            .map_err(|e| RsmlError::invalid_syntax(number, e))?;
        let source = cursor.text();

        lines.push(TokenizedLine {
            number,
            text: source.to_string(),
            tokens: line
                .iter()
                .map(|token| TokenInfo {
                    kind: token.kind,
                    range: (!token.is_synthetic()).then_some((token.range.start, token.range.end)),
                    text: token.text(source).to_string(),
                })
                .collect(),
        });
        Ok(())
    })?;

    Ok(TokenizedDocument {
        lines,
        metrics: analyzer.metrics().clone(),
    })
}

/// Evaluate `text` against `machine` with a fresh evaluator
pub fn evaluate_str(text: &str, machine: &MachineDescriptor) -> Result<EvaluationResult, RsmlError> {
    Evaluator::new(text).evaluate_with(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const DOCUMENT: &str = "# Runtime selection\n\
                            \n\
                            @Void\n\
                            !> osx < 11 any \"macOS 10 is not supported\"\n\
                            -> debian   x64 \"debian-x64\"\n\
                            -> windows >= 10 any \"win10\"\n\
                            -> \"portable\"\n";

    #[test]
    fn test_check_document_counts() {
        let summary = check_document(DOCUMENT).unwrap();
        assert_eq!(
            summary,
            DocumentSummary {
                lines: 7,
                blank_lines: 1,
                comment_lines: 1,
                special_action_lines: 1,
                logic_path_lines: 4,
            }
        );
    }

    #[test]
    fn test_check_document_reports_line() {
        assert_matches!(
            check_document("# ok\n\n-> windows ==defined defined \"X\""),
            Err(RsmlError::InvalidSyntax { line: 3, .. })
        );
    }

    #[test]
    fn test_format_document_normalizes_spacing() {
        let formatted = format_document("   ->   linux    x64 \"a  b\"  \n\n#   note  \n@Print  hi there").unwrap();
        assert_eq!(formatted, "-> linux x64 \"a  b\"\n\n# note\n@Print hi there\n");
    }

    #[test]
    fn test_formatted_document_evaluates_the_same() {
        let formatted = format_document(DOCUMENT).unwrap();
        let machines = [
            MachineDescriptor::new("osx", "arm64", Some(10)),
            MachineDescriptor::linux("ubuntu", "debian", "x64", Some(22)),
            MachineDescriptor::new("windows", "x86", Some(11)),
            MachineDescriptor::default(),
        ];
        for machine in machines {
            assert_eq!(
                evaluate_str(DOCUMENT, &machine),
                evaluate_str(&formatted, &machine)
            );
        }
    }

    #[test]
    fn test_format_rejects_invalid_documents() {
        assert_matches!(
            format_document("-> mars \"x\""),
            Err(RsmlError::InvalidSyntax { line: 1, .. })
        );
    }

    #[test]
    fn test_tokenize_document() {
        let document = tokenize_document("# c\n\n-> linux \"v\"").unwrap();
        assert_eq!(document.lines.len(), 2);
        assert_eq!(document.lines[1].number, 3);

        let kinds: Vec<TokenKind> = document.lines[1].tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ReturnOperator,
                TokenKind::SystemName,
                TokenKind::LogicPathValue,
                TokenKind::Eol
            ]
        );
        assert_eq!(document.lines[1].tokens[2].text, "v");
        assert_eq!(document.lines[1].tokens[3].range, None);
        assert_eq!(document.metrics.lines, 2);
    }

    #[test]
    fn test_evaluate_str() {
        let machine = MachineDescriptor::new("windows", "x64", Some(10));
        assert_eq!(
            evaluate_str(DOCUMENT, &machine),
            Ok(EvaluationResult::Match("win10".to_string()))
        );
    }
}
