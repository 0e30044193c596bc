//! Line normalization
//!
//! Collapses the five surface overloads of a logic path into the two
//! canonical shapes and completes comment and special-action lines:
//!
//! | raw content (without `Eol`)   | canonical content                    |
//! |-------------------------------|--------------------------------------|
//! | `op value`                    | `op any any any value`               |
//! | `op sys value`                | `op sys any any value`               |
//! | `op sys arch value`           | `op sys any arch value`              |
//! | `op sys ver arch value`       | unchanged                            |
//! | `op sys cmp ver arch value`   | unchanged                            |
//! | `#`                           | `# <empty text>`                     |
//! | `@ name`                      | `@ name <empty argument>`            |
//!
//! Normalization looks at token kinds only, never at text, and always
//! leaves the line terminated by `Eol`. Running it twice is a no-op.
//! Shapes with no canonical form are reported as [`NormalizerError`] and
//! the line is cleared.

pub mod error;

pub use error::{NormalizerError, NormalizerResult};

use crate::log_debug;
use crate::tokens::{Line, Token, TokenKind};

/// Canonical logic-path length without a comparator (excluding `Eol`)
pub const LOGIC_PATH_LENGTH: usize = 5;
/// Canonical logic-path length with a comparator (excluding `Eol`)
pub const COMPARED_LOGIC_PATH_LENGTH: usize = 6;

const WILDCARD: Token = Token::synthetic(TokenKind::WildcardKeyword);

/// Normalize `line` in place and return its new length (including `Eol`)
pub fn normalize_line(line: &mut Line) -> NormalizerResult<usize> {
    let leading = match line.first() {
        Some(token) => token.kind,
        None => return Err(NormalizerError::EmptyLine),
    };

    let result = match leading {
        TokenKind::Eol | TokenKind::Eof => Ok(line.len()),
        TokenKind::CommentSymbol => reshape(line, leading, normalize_comment),
        TokenKind::SpecialActionSymbol => reshape(line, leading, normalize_special_action),
        TokenKind::ReturnOperator | TokenKind::ThrowErrorOperator => {
            reshape(line, leading, normalize_logic_path)
        }
        kind => Err(NormalizerError::UnexpectedLeadingToken { kind }),
    };

    match &result {
        Ok(length) => {
            log_debug!("Line normalized", "leading" => leading, "length" => length);
        }
        Err(_) => line.clear(),
    }

    result
}

/// Strip the terminator, apply `rule` to the content, then terminate again
fn reshape(
    line: &mut Line,
    leading: TokenKind,
    rule: fn(&mut Line) -> bool,
) -> NormalizerResult<usize> {
    let raw_length = line.len();
    if line.ends_with_eol() {
        line.pop();
    }

    let malformed = NormalizerError::MalformedShape {
        leading,
        length: raw_length,
    };

    if !rule(line) {
        return Err(malformed);
    }
    line.push(Token::synthetic(TokenKind::Eol))
        .map_err(|_| malformed)?;

    Ok(line.len())
}

fn normalize_comment(line: &mut Line) -> bool {
    match line.len() {
        1 => line.push(Token::synthetic(TokenKind::CommentText)).is_ok(),
        2 => true,
        _ => false,
    }
}

fn normalize_special_action(line: &mut Line) -> bool {
    match line.len() {
        2 => line
            .push(Token::synthetic(TokenKind::SpecialActionArgument))
            .is_ok(),
        3 => true,
        _ => false,
    }
}

fn normalize_logic_path(line: &mut Line) -> bool {
    // Wildcards go in front of the value, which is always last
    let missing: &[usize] = match line.len() {
        // Operator alone: left for validation to reject
        1 => &[],
        2 => &[1, 1, 1],
        3 => &[2, 2],
        4 => &[2],
        LOGIC_PATH_LENGTH | COMPARED_LOGIC_PATH_LENGTH => &[],
        _ => return false,
    };

    missing
        .iter()
        .all(|index| line.insert(*index, WILDCARD).is_ok())
}

/// Whether `line` is already in canonical form
pub fn is_canonical(line: &Line) -> bool {
    let mut copy = *line;
    normalize_line(&mut copy).is_ok() && copy == *line
}

pub fn specification_compliance() -> crate::compliance::SpecificationCompliance {
    crate::compliance::SpecificationCompliance::full(crate::compliance::LANGUAGE_VERSION)
}
