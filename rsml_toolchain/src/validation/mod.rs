//! Line validation
//!
//! Checks a normalized [`Line`] against the per-shape grammar and the closed
//! vocabularies. Validation reads token text (system names, architectures,
//! versions) but never changes the line. A trailing `Eol` is ignored.
//!
//! Accepted logic-path content lengths, excluding the operator:
//!
//! ```text
//! 1  value
//! 2  system value
//! 3  system architecture value
//! 4  system version architecture value
//! 5  system comparator version architecture value
//! ```
//!
//! With a comparator the version must be a literal integer; `any` and
//! `defined` are rejected there.

pub mod error;

pub use error::{BufferValidationError, ValidationError, ValidationResult};

use crate::log_debug;
use crate::tokens::vocabulary::{self, actions, DEFINED_KEYWORD, WILDCARD_KEYWORD};
use crate::tokens::{Line, Token, TokenKind};

const SYSTEM_SLOT: &str = "system name, any or defined";
const ARCHITECTURE_SLOT: &str = "architecture, any or defined";
const VERSION_SLOT: &str = "major version, any or defined";
const VALUE_SLOT: &str = "quoted value";

/// Validate one line whose tokens index into `text`
pub fn validate_line(line: &Line, text: &str) -> ValidationResult<()> {
    let mut tokens = line.as_slice();
    if tokens.len() > 1 && line.ends_with_eol() {
        tokens = &tokens[..tokens.len() - 1];
    }

    let Some(first) = tokens.first() else {
        return Err(ValidationError::EmptySequence);
    };

    match first.kind {
        TokenKind::Eol | TokenKind::Eof => match tokens.len() {
            1 => Ok(()),
            length => Err(ValidationError::UnrecognizedOverload { length }),
        },
        TokenKind::CommentSymbol => validate_comment(tokens),
        TokenKind::SpecialActionSymbol => validate_special_action(tokens, text),
        TokenKind::ReturnOperator | TokenKind::ThrowErrorOperator => {
            validate_logic_path(tokens, text)
        }
        kind => Err(ValidationError::UnrecognizedStart { kind }),
    }
}

fn validate_comment(tokens: &[Token]) -> ValidationResult<()> {
    match tokens {
        [_, text] if text.kind == TokenKind::CommentText => Ok(()),
        _ => Err(ValidationError::InvalidComment {
            length: tokens.len(),
        }),
    }
}

fn validate_special_action(tokens: &[Token], text: &str) -> ValidationResult<()> {
    let [_, name, argument] = tokens else {
        return Err(ValidationError::InvalidSpecialAction {
            length: tokens.len(),
        });
    };

    if name.kind != TokenKind::SpecialActionName
        || argument.kind != TokenKind::SpecialActionArgument
    {
        return Err(ValidationError::InvalidSpecialAction {
            length: tokens.len(),
        });
    }

    // Custom names are resolved against the registry at evaluation time
    let name = name.text(text);
    if actions::is_built_in(name) || vocabulary::is_well_formed_action_name(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidActionName {
            name: name.to_string(),
        })
    }
}

fn validate_logic_path(tokens: &[Token], text: &str) -> ValidationResult<()> {
    validate_operator(&tokens[0], text)?;

    match tokens {
        [_, value] => validate_value(1, value),
        [_, system, value] => {
            validate_system(1, system, text)?;
            validate_value(2, value)
        }
        [_, system, architecture, value] => {
            validate_system(1, system, text)?;
            validate_architecture(2, architecture, text)?;
            validate_value(3, value)
        }
        [_, system, version, architecture, value] => {
            validate_system(1, system, text)?;
            validate_version(2, version, text)?;
            validate_architecture(3, architecture, text)?;
            validate_value(4, value)
        }
        [_, system, comparator, version, architecture, value] => {
            validate_system(1, system, text)?;
            validate_comparator(comparator, text)?;
            if version.kind != TokenKind::MajorVersionId {
                return Err(ValidationError::ComparatorRequiresVersion {
                    found: version.kind,
                });
            }
            validate_version(3, version, text)?;
            validate_architecture(4, architecture, text)?;
            validate_value(5, value)
        }
        _ => Err(ValidationError::UnrecognizedOverload {
            length: tokens.len(),
        }),
    }
}

fn validate_operator(operator: &Token, text: &str) -> ValidationResult<()> {
    if operator.is_synthetic() {
        return Ok(());
    }
    let found = operator.text(text);
    if vocabulary::operator_kind(found) == Some(operator.kind) {
        Ok(())
    } else {
        Err(ValidationError::InvalidOperator {
            text: found.to_string(),
        })
    }
}

/// `any` / `defined` tokens must carry exactly their keyword; synthesized
/// ones carry no text
fn validate_placeholder(token: &Token, text: &str) -> ValidationResult<()> {
    let expected = match token.kind {
        TokenKind::WildcardKeyword => WILDCARD_KEYWORD,
        _ => DEFINED_KEYWORD,
    };
    let found = token.text(text);
    if token.is_synthetic() || found == expected {
        Ok(())
    } else {
        Err(ValidationError::KeywordTextMismatch {
            kind: token.kind,
            expected,
            text: found.to_string(),
        })
    }
}

fn validate_system(position: usize, token: &Token, text: &str) -> ValidationResult<()> {
    match token.kind {
        TokenKind::SystemName => {
            let name = token.text(text);
            if vocabulary::is_system_name(name) {
                Ok(())
            } else {
                Err(ValidationError::InvalidSystemName {
                    name: name.to_string(),
                })
            }
        }
        kind if kind.is_placeholder() => validate_placeholder(token, text),
        found => Err(ValidationError::mismatch(position, SYSTEM_SLOT, found)),
    }
}

fn validate_architecture(position: usize, token: &Token, text: &str) -> ValidationResult<()> {
    match token.kind {
        TokenKind::ArchitectureIdentifier => {
            let name = token.text(text);
            if vocabulary::is_architecture(name) {
                Ok(())
            } else {
                Err(ValidationError::InvalidArchitecture {
                    name: name.to_string(),
                })
            }
        }
        kind if kind.is_placeholder() => validate_placeholder(token, text),
        found => Err(ValidationError::mismatch(position, ARCHITECTURE_SLOT, found)),
    }
}

fn validate_version(position: usize, token: &Token, text: &str) -> ValidationResult<()> {
    match token.kind {
        TokenKind::MajorVersionId => {
            let version = token.text(text);
            match vocabulary::parse_major_version(version) {
                Some(_) => Ok(()),
                None => Err(ValidationError::InvalidMajorVersion {
                    text: version.to_string(),
                }),
            }
        }
        kind if kind.is_placeholder() => validate_placeholder(token, text),
        found => Err(ValidationError::mismatch(position, VERSION_SLOT, found)),
    }
}

fn validate_comparator(token: &Token, text: &str) -> ValidationResult<()> {
    let symbol = token.text(text);
    let consistent = token.is_synthetic() || vocabulary::comparator_kind(symbol) == Some(token.kind);
    if token.kind.is_comparator() && consistent {
        Ok(())
    } else {
        Err(ValidationError::InvalidComparator {
            text: symbol.to_string(),
        })
    }
}

fn validate_value(position: usize, token: &Token) -> ValidationResult<()> {
    if token.kind == TokenKind::LogicPathValue {
        Ok(())
    } else {
        Err(ValidationError::mismatch(position, VALUE_SLOT, token.kind))
    }
}

fn validate_segment(
    segment: &[Token],
    text: &str,
    index: usize,
) -> Result<(), BufferValidationError> {
    let line = Line::from_tokens(segment).map_err(|_| BufferValidationError {
        line: index,
        error: ValidationError::UnrecognizedOverload {
            length: segment.len(),
        },
    })?;
    validate_line(&line, text).map_err(|error| BufferValidationError { line: index, error })
}

/// Validate a whole tokenized document, one `Eol`-terminated segment at a
/// time, stopping at `Eof`. Returns the number of lines validated.
pub fn validate_buffer(tokens: &[Token], text: &str) -> Result<usize, BufferValidationError> {
    let mut validated = 0;
    let mut start = 0;

    for (position, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Eol => {
                validate_segment(&tokens[start..=position], text, validated)?;
                validated += 1;
                start = position + 1;
            }
            TokenKind::Eof => break,
            _ => {}
        }
    }

    // Trailing tokens with no terminator before Eof or the end
    let tail_end = tokens
        .iter()
        .position(|t| t.kind == TokenKind::Eof)
        .unwrap_or(tokens.len());
    if start < tail_end {
        validate_segment(&tokens[start..tail_end], text, validated)?;
        validated += 1;
    }

    log_debug!("Token buffer validated", "lines" => validated);
    Ok(validated)
}

pub fn specification_compliance() -> crate::compliance::SpecificationCompliance {
    crate::compliance::SpecificationCompliance::full(crate::compliance::LANGUAGE_VERSION)
}
