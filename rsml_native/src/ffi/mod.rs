//! # C ABI for the RSML toolchain
//!
//! Exported functions never unwind into the caller: every body runs inside
//! [`guard`], and failures are logged with their code and returned as the
//! negative statuses in [`status`].
//!
//! ## Exports
//!
//! | function | purpose |
//! |---|---|
//! | `rsml_normalize_line` | normalize an [`RsmlLine`] in place of an output line |
//! | `rsml_tokenize_line` | lex one line of text into an [`RsmlLine`] |
//! | `rsml_evaluate_document` | evaluate a document against the probed host |
//! | `rsml_evaluator_*` | opaque evaluator handle with C special actions |
//! | `rsml_get_api_version`, `rsml_get_language_version`, `rsml_get_api_author_name` | metadata |

pub mod exports;
pub mod handle;
pub mod metadata;
pub mod status;
pub mod types;

pub use handle::{RsmlEvaluator, RsmlSpecialActionCallback};
pub use status::FfiError;
pub use types::{RsmlLine, RsmlMachine, RsmlToken};

use rsml_toolchain::evaluation::EvaluationResult;
use rsml_toolchain::log_error;
use std::os::raw::c_int;
use std::panic::{catch_unwind, UnwindSafe};

/// Run an export body, turning errors into statuses and panics into
/// `on_panic`
pub(crate) fn guard<F>(function: &'static str, on_panic: c_int, body: F) -> c_int
where
    F: FnOnce() -> Result<c_int, (FfiError, c_int)> + UnwindSafe,
{
    match catch_unwind(body) {
        Ok(Ok(status)) => status,
        Ok(Err((error, status))) => {
            report(function, &error);
            status
        }
        Err(_) => {
            report(function, &FfiError::Panic { function });
            on_panic
        }
    }
}

pub(crate) fn report(function: &'static str, error: &FfiError) {
    log_error!(error.error_code(), "Native call failed",
        "function" => function,
        "error" => error
    );
    crate::facade_debug!("{} failed: {}", function, error);
}

/// Borrow `len` bytes at `data` as UTF-8
///
/// # Safety
/// `data` must be null or valid for reads of `len` bytes for `'a`.
pub(crate) unsafe fn borrow_str<'a>(data: *const u8, len: usize) -> Result<&'a str, FfiError> {
    if data.is_null() {
        return Err(FfiError::NullPointer);
    }
    let bytes = std::slice::from_raw_parts(data, len);
    std::str::from_utf8(bytes).map_err(|_| FfiError::InvalidUtf8)
}

/// Copy `bytes` into `buffer`, optionally followed by a NUL byte
///
/// # Safety
/// `buffer` must be null or valid for writes of `size` bytes.
pub(crate) unsafe fn write_bytes(
    bytes: &[u8],
    buffer: *mut u8,
    size: usize,
    terminate: bool,
) -> Result<usize, FfiError> {
    if buffer.is_null() {
        return Err(FfiError::NullPointer);
    }
    let needed = bytes.len() + usize::from(terminate);
    if needed > size {
        return Err(FfiError::BufferTooSmall {
            needed,
            available: size,
        });
    }
    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer, bytes.len());
    if terminate {
        *buffer.add(bytes.len()) = 0;
    }
    Ok(bytes.len())
}

/// Map an evaluation result onto the evaluation statuses, writing a match
/// value (NUL-terminated) into the result buffer
///
/// # Safety
/// `buffer` must be null or valid for writes of `size` bytes.
pub(crate) unsafe fn write_evaluation(
    result: EvaluationResult,
    buffer: *mut u8,
    size: usize,
) -> Result<c_int, (FfiError, c_int)> {
    match result {
        EvaluationResult::NoMatch => Ok(status::evaluation::NO_MATCH),
        EvaluationResult::Match(value) => write_bytes(value.as_bytes(), buffer, size, true)
            .map(|_| status::evaluation::MATCH)
            .map_err(|error| (error, status::evaluation::ERROR)),
    }
}
