//! Opaque evaluator handle
//!
//! Lets native callers keep an evaluator around, register special actions
//! implemented in C and evaluate against their own machine descriptor. The
//! handle is not thread-safe; callers serialize access themselves.

use super::status::{evaluation, FfiError};
use super::types::RsmlMachine;
use super::{borrow_str, guard, report, write_evaluation};
use crate::host;
use rsml_toolchain::evaluation::{Evaluator, RegistrationError};
use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Special action callback: receives the argument bytes (not terminated) and
/// the registration's `user_data`, returns 0 continue, 1 error, 250 stop or
/// 251 reset registry
pub type RsmlSpecialActionCallback =
    extern "C" fn(argument: *const u8, argument_len: usize, user_data: *mut c_void) -> u8;

/// `rsml_evaluator_register_special_action` codes
pub mod registration {
    use std::os::raw::c_int;

    pub const OK: c_int = 0;
    pub const NULL_POINTER: c_int = -1;
    pub const REJECTED: c_int = -2;
    pub const INVALID_UTF8: c_int = -3;
}

pub struct RsmlEvaluator {
    evaluator: Evaluator,
}

struct CallbackData(*mut c_void);

// The caller owns `user_data` and guarantees it outlives the handle; the
// evaluator only calls back on the thread driving it.
unsafe impl Send for CallbackData {}

/// Create an evaluator over a copy of `document`. Returns null on null or
/// non-UTF-8 input.
///
/// # Safety
/// `document` must be valid for reads of `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_evaluator_new(document: *const u8, len: usize) -> *mut RsmlEvaluator {
    match borrow_str(document, len) {
        Ok(text) => Box::into_raw(Box::new(RsmlEvaluator {
            evaluator: Evaluator::new(text),
        })),
        Err(error) => {
            report("rsml_evaluator_new", &error);
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must be null or a pointer returned by `rsml_evaluator_new` that
/// has not been freed.
#[no_mangle]
pub unsafe extern "C" fn rsml_evaluator_free(handle: *mut RsmlEvaluator) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Register a special action named by the NUL-terminated `name`.
///
/// Returns `0` on success, `-1` for a null argument, `-2` when the name is
/// reserved, malformed or the registry is full and `-3` for a non-UTF-8 name.
///
/// # Safety
/// `handle` must be a live handle and `name` a NUL-terminated string.
/// `user_data` is passed back untouched and must stay valid while the
/// handle lives.
#[no_mangle]
pub unsafe extern "C" fn rsml_evaluator_register_special_action(
    handle: *mut RsmlEvaluator,
    name: *const c_char,
    callback: Option<RsmlSpecialActionCallback>,
    user_data: *mut c_void,
) -> c_int {
    let callback = match callback {
        Some(callback) if !handle.is_null() && !name.is_null() => callback,
        _ => {
            report("rsml_evaluator_register_special_action", &FfiError::NullPointer);
            return registration::NULL_POINTER;
        }
    };
    let name = match CStr::from_ptr(name).to_str() {
        Ok(name) => name,
        Err(_) => {
            report("rsml_evaluator_register_special_action", &FfiError::InvalidUtf8);
            return registration::INVALID_UTF8;
        }
    };

    let data = CallbackData(user_data);
    let registered = (*handle)
        .evaluator
        .register_coded_special_action(name, move |argument: &str| {
            let data = &data;
            callback(argument.as_ptr(), argument.len(), data.0)
        });

    match registered {
        Ok(()) => registration::OK,
        Err(error) => {
            log_rejection(name, &error);
            registration::REJECTED
        }
    }
}

fn log_rejection(name: &str, error: &RegistrationError) {
    rsml_toolchain::log_error!(error.error_code(), "Special action rejected",
        "name" => name,
        "reason" => error
    );
    crate::facade_debug!("special action '{}' rejected: {}", name, error);
}

/// Evaluate the handle's document.
///
/// `machine` may be null to evaluate against the probed host. Result codes
/// and buffer handling match `rsml_evaluate_document`.
///
/// # Safety
/// `handle` must be a live handle; `machine` must be null or point to a
/// valid `RsmlMachine`; `result` must be null or valid for writes of
/// `result_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_evaluator_evaluate(
    handle: *mut RsmlEvaluator,
    machine: *const RsmlMachine,
    result: *mut u8,
    result_len: usize,
) -> c_int {
    let handle = AssertUnwindSafe(handle);
    guard("rsml_evaluator_evaluate", evaluation::ERROR, move || {
        let fail = |error: FfiError| (error, evaluation::ERROR);
        let handle = handle;
        if handle.0.is_null() {
            return Err(fail(FfiError::NullPointer));
        }

        let descriptor = if machine.is_null() {
            host::detect()
        } else {
            (*machine).to_descriptor().map_err(fail)?
        };

        let outcome = (*handle.0)
            .evaluator
            .evaluate_with(&descriptor)
            .map_err(|error| fail(error.into()))?;
        write_evaluation(outcome, result, result_len)
    })
}

/// Number of special actions currently registered, `-1` for a null handle
///
/// # Safety
/// `handle` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn rsml_evaluator_special_action_count(handle: *const RsmlEvaluator) -> c_int {
    if handle.is_null() {
        return -1;
    }
    catch_unwind(AssertUnwindSafe(|| (*handle).evaluator.special_action_count() as c_int))
        .unwrap_or(-1)
}
