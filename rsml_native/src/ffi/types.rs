//! `#[repr(C)]` structs shared with native callers
//!
//! A token is 12 bytes (`u8` kind, padding, two `i32` offsets) and a line is
//! eight tokens, 96 bytes. Offsets are byte positions in the caller's line
//! text; a negative `start` marks a token with no text. Unused slots hold
//! [`RsmlToken::EMPTY_SLOT`].

use super::status::FfiError;
use rsml_toolchain::machine::MachineDescriptor;
use rsml_toolchain::tokens::{Line, TextRange, Token, TokenKind, LINE_CAPACITY};
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsmlToken {
    pub kind: u8,
    pub start: i32,
    pub end: i32,
}

impl RsmlToken {
    pub const EMPTY_SLOT: RsmlToken = RsmlToken {
        kind: TokenKind::UndefinedToken as u8,
        start: -1,
        end: 0,
    };
}

impl From<Token> for RsmlToken {
    fn from(token: Token) -> Self {
        if token.is_synthetic() {
            return RsmlToken {
                kind: token.kind.as_u8(),
                start: -1,
                end: 0,
            };
        }
        RsmlToken {
            kind: token.kind.as_u8(),
            start: offset(token.range.start),
            end: offset(token.range.end),
        }
    }
}

impl TryFrom<RsmlToken> for Token {
    type Error = FfiError;

    fn try_from(token: RsmlToken) -> Result<Self, Self::Error> {
        let kind = TokenKind::from_u8(token.kind).ok_or(FfiError::InvalidTokenKind {
            kind: token.kind,
        })?;
        if token.start < 0 {
            return Ok(Token::synthetic(kind));
        }
        if token.end < token.start {
            return Err(FfiError::InvalidTokenRange {
                start: token.start,
                end: token.end,
            });
        }
        Ok(Token::new(
            kind,
            TextRange::new(token.start as usize, token.end as usize),
        ))
    }
}

fn offset(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsmlLine {
    pub items: [RsmlToken; LINE_CAPACITY],
}

impl RsmlLine {
    pub const EMPTY: RsmlLine = RsmlLine {
        items: [RsmlToken::EMPTY_SLOT; LINE_CAPACITY],
    };
}

impl Default for RsmlLine {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<&Line> for RsmlLine {
    fn from(line: &Line) -> Self {
        let mut native = RsmlLine::EMPTY;
        for (slot, token) in native.items.iter_mut().zip(line.iter()) {
            *slot = RsmlToken::from(*token);
        }
        native
    }
}

impl TryFrom<&RsmlLine> for Line {
    type Error = FfiError;

    fn try_from(native: &RsmlLine) -> Result<Self, Self::Error> {
        let mut slots = [Token::EMPTY; LINE_CAPACITY];
        for (slot, token) in slots.iter_mut().zip(native.items.iter()) {
            *slot = Token::try_from(*token)?;
        }
        Ok(Line::from_slots(slots))
    }
}

/// Machine descriptor passed by native callers. Null strings and a negative
/// `system_version` mean the field is absent.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RsmlMachine {
    pub system_name: *const c_char,
    pub distro_name: *const c_char,
    pub distro_family: *const c_char,
    pub processor_architecture: *const c_char,
    pub system_version: c_int,
}

impl RsmlMachine {
    /// # Safety
    /// Every non-null string pointer must reference a NUL-terminated string
    /// that stays valid for the duration of the call.
    pub unsafe fn to_descriptor(&self) -> Result<MachineDescriptor, FfiError> {
        Ok(MachineDescriptor {
            system_name: optional_string(self.system_name)?,
            distro_name: optional_string(self.distro_name)?,
            distro_family: optional_string(self.distro_family)?,
            processor_architecture: optional_string(self.processor_architecture)?,
            system_version: (self.system_version >= 0).then_some(self.system_version),
        })
    }
}

unsafe fn optional_string(pointer: *const c_char) -> Result<Option<String>, FfiError> {
    if pointer.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(pointer)
        .to_str()
        .map(|text| Some(text.to_string()))
        .map_err(|_| FfiError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::ffi::CString;
    use std::mem::size_of;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(size_of::<RsmlToken>(), 12);
        assert_eq!(size_of::<RsmlLine>(), 96);
    }

    #[test]
    fn test_empty_slot_maps_to_empty_token() {
        assert_eq!(Token::try_from(RsmlToken::EMPTY_SLOT), Ok(Token::EMPTY));
        assert_eq!(RsmlToken::from(Token::EMPTY), RsmlToken::EMPTY_SLOT);
    }

    #[test]
    fn test_line_conversion() {
        let line = Line::from_tokens(&[
            Token::new(TokenKind::ReturnOperator, TextRange::new(0, 2)),
            Token::synthetic(TokenKind::WildcardKeyword),
            Token::new(TokenKind::LogicPathValue, TextRange::new(4, 5)),
        ])
        .unwrap();

        let native = RsmlLine::from(&line);
        assert_eq!(native.items[0], RsmlToken { kind: 7, start: 0, end: 2 });
        assert_eq!(native.items[1], RsmlToken { kind: 12, start: -1, end: 0 });
        assert_eq!(native.items[3], RsmlToken::EMPTY_SLOT);

        assert_eq!(Line::try_from(&native), Ok(line));
    }

    #[test]
    fn test_invalid_kind_is_rejected() {
        let token = RsmlToken { kind: 22, start: 0, end: 1 };
        assert_matches!(Token::try_from(token), Err(FfiError::InvalidTokenKind { kind: 22 }));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let token = RsmlToken { kind: 9, start: 5, end: 2 };
        assert_matches!(Token::try_from(token), Err(FfiError::InvalidTokenRange { .. }));
    }

    #[test]
    fn test_machine_conversion() {
        let system = CString::new("linux").unwrap();
        let distro = CString::new("ubuntu").unwrap();
        let machine = RsmlMachine {
            system_name: system.as_ptr(),
            distro_name: distro.as_ptr(),
            distro_family: std::ptr::null(),
            processor_architecture: std::ptr::null(),
            system_version: -1,
        };

        let descriptor = unsafe { machine.to_descriptor() }.unwrap();
        assert!(descriptor.is_linux());
        assert_eq!(descriptor.distro_name.as_deref(), Some("ubuntu"));
        assert_eq!(descriptor.distro_family, None);
        assert_eq!(descriptor.system_version, None);
    }
}
