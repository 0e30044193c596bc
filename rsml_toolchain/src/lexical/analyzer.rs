//! Line lexer
//!
//! Turns the line at the cursor into a [`Line`] of zero-copy tokens. Reads
//! stop at the `\n` / `\r\n` terminator, so a staged line and a whole
//! document lex the same way. The lexer classifies and never rejects:
//! anything it does not recognise becomes `UndefinedToken` for the validator
//! to report. The only failures are resource limits (line length, token
//! capacity).

use crate::config::compile_time::lexical::MAX_LINE_LENGTH;
use crate::cursor::TextCursor;
use crate::logging::codes;
use crate::tokens::vocabulary::{
    self, COMMENT_SYMBOL, DEFINED_KEYWORD, SPECIAL_ACTION_SYMBOL, VALUE_QUOTE, WILDCARD_KEYWORD,
};
use crate::tokens::{Line, TextRange, Token, TokenKind, LINE_CAPACITY};
use crate::{log_debug, log_error};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Line too long: {length} bytes (max {MAX_LINE_LENGTH})")]
    LineTooLong { length: usize },

    #[error("Too many tokens: {count} (a line holds at most {LINE_CAPACITY})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::LineTooLong { .. } => codes::lexical::LINE_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }
}

/// Counts gathered across the lines a [`LexicalAnalyzer`] has seen
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub special_action_lines: usize,
    pub logic_path_lines: usize,
    pub undefined_tokens: usize,
    pub total_tokens: usize,
    pub max_line_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_line(&mut self, line: &Line, length: usize) {
        self.lines += 1;
        self.total_tokens += line.len();
        self.max_line_length = self.max_line_length.max(length);
        self.undefined_tokens += line
            .kinds()
            .filter(|kind| *kind == TokenKind::UndefinedToken)
            .count();

        match line.kind(0) {
            TokenKind::Eol | TokenKind::Eof => self.blank_lines += 1,
            TokenKind::CommentSymbol => self.comment_lines += 1,
            TokenKind::SpecialActionSymbol => self.special_action_lines += 1,
            _ => self.logic_path_lines += 1,
        }
    }
}

/// Stateful front for the line lexer that keeps [`LexicalMetrics`]
#[derive(Debug, Default)]
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize_line(&mut self, cursor: &mut TextCursor<'_>) -> Result<Line, LexerError> {
        let length = cursor.line_remaining().len();
        let line = tokenize_line(cursor)?;
        self.metrics.record_line(&line, length);
        Ok(line)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn reset(&mut self) {
        self.metrics = LexicalMetrics::default();
    }
}

fn push(line: &mut Line, token: Token) -> Result<(), LexerError> {
    line.push(token).map_err(|_| {
        let error = LexerError::TooManyTokens {
            count: LINE_CAPACITY + 1,
        };
        log_error!(error.error_code(), "Token limit exceeded",
            "limit" => LINE_CAPACITY
        );
        error
    })
}

/// Trim trailing whitespace off a range of the cursor's active text
fn trim_end(cursor: &TextCursor<'_>, range: TextRange) -> TextRange {
    let trimmed = cursor.slice(range).trim_end().len();
    TextRange::new(range.start, range.start + trimmed)
}

/// Tokenize the line at the cursor and leave the cursor past its terminator.
///
/// Every produced line ends with an `Eol` token. Token ranges index the
/// cursor's active buffer.
pub fn tokenize_line(cursor: &mut TextCursor<'_>) -> Result<Line, LexerError> {
    let length = cursor.line_remaining().len();
    if length > MAX_LINE_LENGTH {
        let error = LexerError::LineTooLong { length };
        log_error!(error.error_code(), "Line exceeds maximum length",
            "length" => length,
            "limit" => MAX_LINE_LENGTH
        );
        return Err(error);
    }

    let mut line = Line::new();
    cursor.skip_line_whitespace();

    match cursor.line_remaining().chars().next() {
        None => {}
        Some(COMMENT_SYMBOL) => tokenize_comment(cursor, &mut line)?,
        Some(SPECIAL_ACTION_SYMBOL) => tokenize_special_action(cursor, &mut line)?,
        Some(_) => tokenize_logic_path(cursor, &mut line)?,
    }

    push(&mut line, Token::synthetic(TokenKind::Eol))?;
    cursor.read_to_line_end();
    cursor.read_line();

    log_debug!("Line tokenized",
        "tokens" => line.len(),
        "leading" => line.kind(0)
    );

    Ok(line)
}

fn tokenize_comment(cursor: &mut TextCursor<'_>, line: &mut Line) -> Result<(), LexerError> {
    let symbol = cursor.read_n(1);
    push(line, Token::new(TokenKind::CommentSymbol, symbol))?;

    cursor.skip_line_whitespace();
    let text = cursor.read_to_line_end();
    push(line, Token::new(TokenKind::CommentText, trim_end(cursor, text)))
}

fn tokenize_special_action(
    cursor: &mut TextCursor<'_>,
    line: &mut Line,
) -> Result<(), LexerError> {
    let symbol = cursor.read_n(1);
    push(line, Token::new(TokenKind::SpecialActionSymbol, symbol))?;

    let name = cursor.read_until_whitespace(true);
    push(line, Token::new(TokenKind::SpecialActionName, name))?;

    // The argument is the remainder of the line, possibly empty
    cursor.skip_line_whitespace();
    let argument = cursor.read_to_line_end();
    push(
        line,
        Token::new(TokenKind::SpecialActionArgument, trim_end(cursor, argument)),
    )
}

fn tokenize_logic_path(cursor: &mut TextCursor<'_>, line: &mut Line) -> Result<(), LexerError> {
    let operator = cursor.read_until_whitespace(true);
    let kind =
        vocabulary::operator_kind(cursor.slice(operator)).unwrap_or(TokenKind::UndefinedToken);
    push(line, Token::new(kind, operator))?;

    loop {
        cursor.skip_line_whitespace();
        match tokenize_logic_path_component(cursor) {
            Some(component) => push(line, component)?,
            None => break,
        }
    }

    if cursor.peek() == Some(VALUE_QUOTE) {
        tokenize_value(cursor, line)?;
    }

    Ok(())
}

/// Capture `"..."` up to the last quote on the line. A lone quote, or text
/// after the closing quote, becomes an `UndefinedToken`.
fn tokenize_value(cursor: &mut TextCursor<'_>, line: &mut Line) -> Result<(), LexerError> {
    let open = cursor.position();
    let close = cursor
        .line_remaining()
        .rfind(VALUE_QUOTE)
        .map(|relative| open + relative);

    match close {
        Some(close) if close > open => {
            let value = TextRange::new(open + 1, close);
            cursor.set_position(close + 1);
            push(line, Token::new(TokenKind::LogicPathValue, value))?;

            cursor.skip_line_whitespace();
            if !cursor.line_remaining().is_empty() {
                let trailing = cursor.read_to_line_end();
                let trailing = trim_end(cursor, trailing);
                push(line, Token::new(TokenKind::UndefinedToken, trailing))?;
            }
        }
        _ => {
            let unterminated = cursor.read_to_line_end();
            let unterminated = trim_end(cursor, unterminated);
            push(line, Token::new(TokenKind::UndefinedToken, unterminated))?;
        }
    }

    Ok(())
}

/// Classify one logic-path component at the cursor.
///
/// Returns `None` without moving the cursor when it sits at the end of the
/// line or on the opening quote of the value.
pub fn tokenize_logic_path_component(cursor: &mut TextCursor<'_>) -> Option<Token> {
    match cursor.peek() {
        None | Some(VALUE_QUOTE) => return None,
        Some(c) if c.is_whitespace() => return None,
        Some(_) => {}
    }

    let range = cursor.read_until_whitespace(true);
    Some(Token::new(classify_component(cursor.slice(range)), range))
}

/// Priority order: keywords, system, architecture, integer, comparator
pub fn classify_component(text: &str) -> TokenKind {
    if text == WILDCARD_KEYWORD {
        TokenKind::WildcardKeyword
    } else if text == DEFINED_KEYWORD {
        TokenKind::DefinedKeyword
    } else if vocabulary::is_system_name(text) {
        TokenKind::SystemName
    } else if vocabulary::is_architecture(text) {
        TokenKind::ArchitectureIdentifier
    } else if vocabulary::parse_major_version(text).is_some() {
        TokenKind::MajorVersionId
    } else {
        vocabulary::comparator_kind(text).unwrap_or(TokenKind::UndefinedToken)
    }
}

/// Rebuild source text from a line and the buffer it was lexed from.
///
/// Tokens are joined with single spaces, synthesized keywords are written
/// out, empty comment/argument tokens are skipped and a trailing `Eol`
/// becomes `\n`.
pub fn create_document_from_tokens(line: &Line, text: &str) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(line.len());

    for token in line {
        let part = match token.kind {
            TokenKind::Eol | TokenKind::Eof | TokenKind::SpecialActionSymbol => continue,
            TokenKind::CommentSymbol => COMMENT_SYMBOL.to_string(),
            TokenKind::SpecialActionName => format!("{}{}", SPECIAL_ACTION_SYMBOL, token.text(text)),
            TokenKind::LogicPathValue => format!("{0}{1}{0}", VALUE_QUOTE, token.text(text)),
            kind if token.is_synthetic() => match vocabulary::synthetic_text(kind) {
                Some(keyword) => keyword.to_string(),
                None => continue,
            },
            _ => {
                let content = token.text(text);
                if content.is_empty() {
                    continue;
                }
                content.to_string()
            }
        };
        parts.push(part);
    }

    let mut document = parts.join(" ");
    if line.ends_with_eol() {
        document.push('\n');
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn lex(source: &str) -> (Line, String) {
        let mut cursor = TextCursor::new(source);
        let line = tokenize_line(&mut cursor).unwrap();
        (line, source.to_string())
    }

    fn kinds(line: &Line) -> Vec<TokenKind> {
        line.kinds().collect()
    }

    #[test]
    fn test_blank_line_is_single_eol() {
        let (line, _) = lex("   \t ");
        assert_eq!(kinds(&line), vec![TokenKind::Eol]);
    }

    #[test]
    fn test_comment() {
        let (line, text) = lex("  # targets net8.0  ");
        assert_eq!(
            kinds(&line),
            vec![TokenKind::CommentSymbol, TokenKind::CommentText, TokenKind::Eol]
        );
        assert_eq!(line.get(1).unwrap().text(&text), "targets net8.0");
    }

    #[test]
    fn test_special_action_with_and_without_argument() {
        let (line, text) = lex("@Print hello world ");
        assert_eq!(
            kinds(&line),
            vec![
                TokenKind::SpecialActionSymbol,
                TokenKind::SpecialActionName,
                TokenKind::SpecialActionArgument,
                TokenKind::Eol
            ]
        );
        assert_eq!(line.get(1).unwrap().text(&text), "Print");
        assert_eq!(line.get(2).unwrap().text(&text), "hello world");

        let (bare, text) = lex("@EndAll");
        assert_eq!(bare.len(), 4);
        assert_eq!(bare.get(2).unwrap().text(&text), "");
    }

    #[test]
    fn test_full_logic_path() {
        let (line, text) = lex("-> windows >= 10 x64 \"win10-x64\"");
        assert_eq!(
            kinds(&line),
            vec![
                TokenKind::ReturnOperator,
                TokenKind::SystemName,
                TokenKind::GreaterThanOrEqualTo,
                TokenKind::MajorVersionId,
                TokenKind::ArchitectureIdentifier,
                TokenKind::LogicPathValue,
                TokenKind::Eol
            ]
        );
        assert_eq!(line.get(5).unwrap().text(&text), "win10-x64");
    }

    #[test]
    fn test_value_runs_to_last_quote() {
        let (line, text) = lex("!> \"say \"hi\" twice\"");
        assert_eq!(line.kind(0), TokenKind::ThrowErrorOperator);
        assert_eq!(line.get(1).unwrap().text(&text), "say \"hi\" twice");
    }

    #[test]
    fn test_unterminated_value_is_undefined() {
        let (line, text) = lex("-> linux \"oops");
        assert_eq!(line.kind(2), TokenKind::UndefinedToken);
        assert_eq!(line.get(2).unwrap().text(&text), "\"oops");
    }

    #[test]
    fn test_trailing_text_after_value_is_undefined() {
        let (line, _) = lex("-> \"x\" extra");
        assert_eq!(
            kinds(&line),
            vec![
                TokenKind::ReturnOperator,
                TokenKind::LogicPathValue,
                TokenKind::UndefinedToken,
                TokenKind::Eol
            ]
        );
    }

    #[test]
    fn test_unknown_operator_is_not_rejected() {
        let (line, _) = lex("=> linux \"x\"");
        assert_eq!(line.kind(0), TokenKind::UndefinedToken);
        assert_eq!(line.kind(1), TokenKind::SystemName);
    }

    #[test]
    fn test_glued_comparator_is_undefined() {
        let (line, _) = lex("-> windows ==defined defined \"X\"");
        assert_eq!(line.kind(2), TokenKind::UndefinedToken);
        assert_eq!(line.kind(3), TokenKind::DefinedKeyword);
    }

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify_component("any"), TokenKind::WildcardKeyword);
        assert_eq!(classify_component("defined"), TokenKind::DefinedKeyword);
        assert_eq!(classify_component("Ubuntu"), TokenKind::SystemName);
        assert_eq!(classify_component("LoongArch64"), TokenKind::ArchitectureIdentifier);
        assert_eq!(classify_component("-3"), TokenKind::MajorVersionId);
        assert_eq!(classify_component("!="), TokenKind::NotEqualTo);
        assert_eq!(classify_component("ANY"), TokenKind::UndefinedToken);
        assert_eq!(classify_component("10.5"), TokenKind::UndefinedToken);
    }

    #[test]
    fn test_component_leaves_cursor_at_quote() {
        let mut cursor = TextCursor::new("\"value\"");
        assert_eq!(tokenize_logic_path_component(&mut cursor), None);
        assert_eq!(cursor.position(), 0);

        let mut cursor = TextCursor::new("x86 \"v\"");
        let token = tokenize_logic_path_component(&mut cursor).unwrap();
        assert_eq!(token.kind, TokenKind::ArchitectureIdentifier);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_stops_at_end_of_line() {
        let source = "-> \"a\"\n-> \"b\"";
        let mut cursor = TextCursor::new(source);

        let first = tokenize_line(&mut cursor).unwrap();
        assert_eq!(first.get(1).unwrap().text(source), "a");
        assert_eq!(cursor.position(), 7);

        let second = tokenize_line(&mut cursor).unwrap();
        assert_eq!(second.get(1).unwrap().text(source), "b");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_comment_and_argument_stop_at_crlf() {
        let source = "# c\r\n@Print hi\r\n-> \"b\"";
        let mut cursor = TextCursor::new(source);

        let comment = tokenize_line(&mut cursor).unwrap();
        assert_eq!(comment.get(1).unwrap().text(source), "c");

        let action = tokenize_line(&mut cursor).unwrap();
        assert_eq!(action.get(1).unwrap().text(source), "Print");
        assert_eq!(action.get(2).unwrap().text(source), "hi");

        let path = tokenize_line(&mut cursor).unwrap();
        assert_eq!(path.kind(0), TokenKind::ReturnOperator);
        assert_eq!(path.get(1).unwrap().text(source), "b");
    }

    #[test]
    fn test_unterminated_value_stays_on_its_line() {
        let source = "-> linux \"oops\n-> \"b\"";
        let mut cursor = TextCursor::new(source);

        let line = tokenize_line(&mut cursor).unwrap();
        assert_eq!(line.kind(2), TokenKind::UndefinedToken);
        assert_eq!(line.get(2).unwrap().text(source), "\"oops");
        assert_eq!(line.len(), 4);
    }

    #[test]
    fn test_line_length_ignores_following_lines() {
        let source = format!("-> \"a\"\n# {}", "a".repeat(MAX_LINE_LENGTH));
        let mut cursor = TextCursor::new(source);
        assert!(tokenize_line(&mut cursor).is_ok());
        assert_matches!(
            tokenize_line(&mut cursor),
            Err(LexerError::LineTooLong { .. })
        );
    }

    #[test]
    fn test_too_many_tokens() {
        let mut cursor = TextCursor::new("-> any any any any any any any any \"x\"");
        assert_matches!(
            tokenize_line(&mut cursor),
            Err(LexerError::TooManyTokens { .. })
        );
    }

    #[test]
    fn test_line_too_long() {
        let long = format!("# {}", "a".repeat(MAX_LINE_LENGTH));
        let mut cursor = TextCursor::new(long);
        assert_matches!(
            tokenize_line(&mut cursor),
            Err(LexerError::LineTooLong { .. })
        );
    }

    #[test]
    fn test_round_trip_reproduces_tokens() {
        let sources = [
            "# a comment",
            "#",
            "@Void",
            "@Print some argument",
            "-> \"always\"",
            "!>   linux   \"no linux\"",
            "-> ubuntu arm64 \"ubuntu-arm\"",
            "-> windows 10 x64 \"win\"",
            "-> osx <= 13 any \"old mac\"",
            "-> any \"quote \" inside\"",
        ];

        for source in sources {
            let (line, text) = lex(source);
            let rebuilt = create_document_from_tokens(&line, &text);
            let (again, again_text) = lex(rebuilt.trim_end_matches('\n'));

            assert_eq!(kinds(&line), kinds(&again), "kinds differ for {source:?}");
            let texts: Vec<_> = line.iter().map(|t| t.text(&text)).collect();
            let again_texts: Vec<_> = again.iter().map(|t| t.text(&again_text)).collect();
            assert_eq!(texts, again_texts, "texts differ for {source:?}");
        }
    }

    #[test]
    fn test_rebuild_writes_synthesized_wildcards() {
        let line = Line::from_tokens(&[
            Token::new(TokenKind::ReturnOperator, TextRange::new(0, 2)),
            Token::synthetic(TokenKind::WildcardKeyword),
            Token::new(TokenKind::LogicPathValue, TextRange::new(4, 5)),
            Token::synthetic(TokenKind::Eol),
        ])
        .unwrap();

        assert_eq!(create_document_from_tokens(&line, "-> \"x\""), "-> any \"x\"\n");
    }
}
