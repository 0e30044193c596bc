//! Line and document exports

use super::status::{evaluation, line, FfiError};
use super::types::RsmlLine;
use super::{borrow_str, guard, write_bytes, write_evaluation};
use crate::host;
use rsml_toolchain::cursor::TextCursor;
use rsml_toolchain::evaluation::Evaluator;
use rsml_toolchain::lexical::tokenize_line;
use rsml_toolchain::normalizer::normalize_line;
use rsml_toolchain::tokens::Line;
use std::os::raw::c_int;

/// Normalize `input` into `output`.
///
/// Returns `0` on success, `-1` for a null pointer, `-2` for an empty line,
/// `-3` for an internal error, `-4` when the result would exceed eight
/// tokens, `-5` for a line with no canonical shape and `-6` for a token with
/// an unknown kind or reversed range. `output` is untouched on failure.
///
/// # Safety
/// `input` and `output` must each be null or point to a valid `RsmlLine`.
#[no_mangle]
pub unsafe extern "C" fn rsml_normalize_line(input: *const RsmlLine, output: *mut RsmlLine) -> c_int {
    guard("rsml_normalize_line", line::INTERNAL_ERROR, || {
        let fail = |error: FfiError| {
            let status = error.line_status();
            (error, status)
        };

        if input.is_null() || output.is_null() {
            return Err(fail(FfiError::NullPointer));
        }

        let mut normalized = Line::try_from(&*input).map_err(fail)?;
        normalize_line(&mut normalized).map_err(|error| fail(error.into()))?;

        *output = RsmlLine::from(&normalized);
        Ok(line::OK)
    })
}

/// Lex the first line of `text` into `output`.
///
/// Returns the number of tokens written (the terminating `Eol` included),
/// `-1` for a null pointer, `-4` for a line needing more than eight tokens
/// and `-3` for invalid UTF-8 or an overlong line. Token offsets are byte
/// positions in `text`.
///
/// # Safety
/// `text` must be valid for reads of `len` bytes; `output` must be null or
/// point to a writable `RsmlLine`.
#[no_mangle]
pub unsafe extern "C" fn rsml_tokenize_line(text: *const u8, len: usize, output: *mut RsmlLine) -> c_int {
    guard("rsml_tokenize_line", line::INTERNAL_ERROR, || {
        let fail = |error: FfiError| {
            let status = error.line_status();
            (error, status)
        };

        if output.is_null() {
            return Err(fail(FfiError::NullPointer));
        }
        let text = borrow_str(text, len).map_err(fail)?;

        let mut cursor = TextCursor::new(text);
        let tokens = tokenize_line(&mut cursor).map_err(|error| fail(error.into()))?;

        *output = RsmlLine::from(&tokens);
        Ok(tokens.len() as c_int)
    })
}

/// Evaluate a UTF-8 document against the probed host machine.
///
/// Returns `1` and writes the NUL-terminated match value to `result` on a
/// match, `0` when nothing matched (`result` untouched) and `-1` when
/// evaluation failed or `result` cannot hold the value and its terminator.
///
/// # Safety
/// `document` must be valid for reads of `len` bytes; `result` must be null
/// or valid for writes of `result_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_evaluate_document(
    document: *const u8,
    len: usize,
    result: *mut u8,
    result_len: usize,
) -> c_int {
    guard("rsml_evaluate_document", evaluation::ERROR, || {
        let fail = |error: FfiError| (error, evaluation::ERROR);

        let text = borrow_str(document, len).map_err(fail)?;
        let machine = host::detect();
        let outcome = Evaluator::new(text)
            .evaluate_with(&machine)
            .map_err(|error| fail(error.into()))?;

        write_evaluation(outcome, result, result_len)
    })
}

/// Probe the host and write its machine descriptor as NUL-terminated JSON.
///
/// Returns the JSON length (terminator excluded) or `-1` when `buffer` is
/// null or too small.
///
/// # Safety
/// `buffer` must be null or valid for writes of `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_probe_host_json(buffer: *mut u8, size: usize) -> c_int {
    guard("rsml_probe_host_json", evaluation::ERROR, || {
        let fail = |error: FfiError| (error, evaluation::ERROR);
        let json = serde_json::to_string(&host::detect())
            .map_err(|error| fail(FfiError::Serialization(error.to_string())))?;
        write_bytes(json.as_bytes(), buffer, size, true)
            .map(|written| written as c_int)
            .map_err(fail)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::types::RsmlToken;
    use rsml_toolchain::tokens::TokenKind;
    use std::ffi::CStr;

    fn lex(text: &str) -> (c_int, RsmlLine) {
        let mut output = RsmlLine::EMPTY;
        let status = unsafe { rsml_tokenize_line(text.as_ptr(), text.len(), &mut output) };
        (status, output)
    }

    fn kinds(line: &RsmlLine) -> Vec<u8> {
        line.items
            .iter()
            .take_while(|token| **token != RsmlToken::EMPTY_SLOT)
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_line() {
        let (status, output) = lex("-> linux x64 \"v\"");
        assert_eq!(status, 5);
        assert_eq!(
            kinds(&output),
            vec![
                TokenKind::ReturnOperator as u8,
                TokenKind::SystemName as u8,
                TokenKind::ArchitectureIdentifier as u8,
                TokenKind::LogicPathValue as u8,
                TokenKind::Eol as u8,
            ]
        );
        assert_eq!(output.items[1], RsmlToken { kind: 9, start: 3, end: 8 });
    }

    #[test]
    fn test_tokenize_line_ignores_later_lines() {
        let text = "-> \"a\"\n-> \"b\"";
        let (status, output) = lex(text);
        assert_eq!(status, 3);
        assert_eq!(output.items[1], RsmlToken { kind: TokenKind::LogicPathValue as u8, start: 4, end: 5 });
        assert_eq!(output.items[3], RsmlToken::EMPTY_SLOT);

        let text = "# c\n-> \"b\"";
        let (status, output) = lex(text);
        assert_eq!(status, 3);
        let comment = output.items[1];
        assert_eq!(&text[comment.start as usize..comment.end as usize], "c");
    }

    #[test]
    fn test_tokenize_null_output() {
        let text = "# c";
        let status = unsafe { rsml_tokenize_line(text.as_ptr(), text.len(), std::ptr::null_mut()) };
        assert_eq!(status, line::NULL_POINTER);
    }

    #[test]
    fn test_normalize_expands_wildcards() {
        let (_, raw) = lex("-> \"v\"");
        let mut output = RsmlLine::EMPTY;
        let status = unsafe { rsml_normalize_line(&raw, &mut output) };

        assert_eq!(status, line::OK);
        assert_eq!(kinds(&output), vec![7, 12, 12, 12, 20, 0]);
        assert_eq!(output.items[1].start, -1);
        assert_eq!(output.items[4], raw.items[1]);
    }

    #[test]
    fn test_normalize_status_codes() {
        let mut output = RsmlLine::EMPTY;
        unsafe {
            assert_eq!(rsml_normalize_line(std::ptr::null(), &mut output), line::NULL_POINTER);
            assert_eq!(rsml_normalize_line(&RsmlLine::EMPTY, &mut output), line::EMPTY_LINE);

            let mut invalid = RsmlLine::EMPTY;
            invalid.items[0] = RsmlToken { kind: 200, start: 0, end: 1 };
            assert_eq!(rsml_normalize_line(&invalid, &mut output), line::INVALID_TOKEN);

            let (_, unknown) = lex("=> \"v\"");
            assert_eq!(rsml_normalize_line(&unknown, &mut output), line::MALFORMED_LINE);
        }
        assert_eq!(output, RsmlLine::EMPTY);
    }

    #[test]
    fn test_evaluate_document_match() {
        let document = "# fallback only\n-> \"portable\"\n";
        let mut buffer = [0u8; 16];
        let status = unsafe {
            rsml_evaluate_document(document.as_ptr(), document.len(), buffer.as_mut_ptr(), buffer.len())
        };

        assert_eq!(status, evaluation::MATCH);
        let value = CStr::from_bytes_until_nul(&buffer).unwrap();
        assert_eq!(value.to_str().unwrap(), "portable");
    }

    #[test]
    fn test_evaluate_document_no_match() {
        let document = "# nothing to return\n\n@Void\n";
        let mut buffer = [0u8; 16];
        let status = unsafe {
            rsml_evaluate_document(document.as_ptr(), document.len(), buffer.as_mut_ptr(), buffer.len())
        };
        assert_eq!(status, evaluation::NO_MATCH);
    }

    #[test]
    fn test_evaluate_document_errors() {
        let mut small = [0u8; 4];
        let document = "-> \"portable\"";
        unsafe {
            assert_eq!(
                rsml_evaluate_document(document.as_ptr(), document.len(), small.as_mut_ptr(), small.len()),
                evaluation::ERROR
            );

            let invalid = "-> martian \"x\"";
            assert_eq!(
                rsml_evaluate_document(invalid.as_ptr(), invalid.len(), small.as_mut_ptr(), small.len()),
                evaluation::ERROR
            );

            assert_eq!(
                rsml_evaluate_document(std::ptr::null(), 0, small.as_mut_ptr(), small.len()),
                evaluation::ERROR
            );
        }
    }

    #[test]
    fn test_probe_host_json() {
        let mut buffer = [0u8; 512];
        let written = unsafe { rsml_probe_host_json(buffer.as_mut_ptr(), buffer.len()) };
        assert!(written > 0);

        let json = std::str::from_utf8(&buffer[..written as usize]).unwrap();
        let descriptor: rsml_toolchain::MachineDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.system_name.as_deref(), rsml_toolchain::machine::target_system());

        let mut small = [0u8; 4];
        assert_eq!(unsafe { rsml_probe_host_json(small.as_mut_ptr(), small.len()) }, evaluation::ERROR);
    }
}
