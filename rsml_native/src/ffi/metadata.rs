//! Metadata exports
//!
//! Each function copies a UTF-8 string (no terminator) into the caller's
//! buffer and returns its length, or `-1` when the buffer is too small.

use super::status::BUFFER_TOO_SMALL;
use super::{report, write_bytes};
use rsml_toolchain::compliance::LANGUAGE_VERSION;
use std::os::raw::c_int;

/// Version of this C API, independent of the crate version
pub const API_VERSION: &str = "2.1.0";

pub const API_AUTHOR_NAME: &str = "OceanApocalypseStudios";

unsafe fn copy_out(function: &'static str, text: &str, buffer: *mut u8, size: usize) -> c_int {
    match write_bytes(text.as_bytes(), buffer, size, false) {
        Ok(written) => written as c_int,
        Err(error) => {
            report(function, &error);
            BUFFER_TOO_SMALL
        }
    }
}

/// # Safety
/// `buffer` must be null or valid for writes of `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_get_api_version(buffer: *mut u8, size: usize) -> c_int {
    copy_out("rsml_get_api_version", API_VERSION, buffer, size)
}

/// Version of the RSML language standard the toolchain implements
///
/// # Safety
/// `buffer` must be null or valid for writes of `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_get_language_version(buffer: *mut u8, size: usize) -> c_int {
    copy_out("rsml_get_language_version", LANGUAGE_VERSION, buffer, size)
}

/// # Safety
/// `buffer` must be null or valid for writes of `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn rsml_get_api_author_name(buffer: *mut u8, size: usize) -> c_int {
    copy_out("rsml_get_api_author_name", API_AUTHOR_NAME, buffer, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version() {
        let mut buffer = [0u8; 16];
        let written = unsafe { rsml_get_api_version(buffer.as_mut_ptr(), buffer.len()) };
        assert_eq!(written, API_VERSION.len() as c_int);
        assert_eq!(&buffer[..written as usize], API_VERSION.as_bytes());
    }

    #[test]
    fn test_language_version() {
        let mut buffer = [0u8; 16];
        let written = unsafe { rsml_get_language_version(buffer.as_mut_ptr(), buffer.len()) };
        assert_eq!(&buffer[..written as usize], b"2.0.0");
    }

    #[test]
    fn test_api_author_name() {
        let mut buffer = [0u8; 32];
        let written = unsafe { rsml_get_api_author_name(buffer.as_mut_ptr(), buffer.len()) };
        assert_eq!(written, 22);
        assert_eq!(&buffer[..written as usize], b"OceanApocalypseStudios");
    }

    #[test]
    fn test_small_buffer() {
        let mut buffer = [0u8; 2];
        unsafe {
            assert_eq!(rsml_get_api_author_name(buffer.as_mut_ptr(), buffer.len()), BUFFER_TOO_SMALL);
            assert_eq!(rsml_get_api_version(std::ptr::null_mut(), 64), BUFFER_TOO_SMALL);
        }
    }
}
