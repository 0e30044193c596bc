//! Logic-path matching against a [`MachineDescriptor`]
//!
//! Each field matches three ways: `any` always, `defined` when the machine
//! field is present, otherwise by case-sensitive text. On Linux machines a
//! system literal may also name the distribution or its family, and a
//! `defined` system needs a known distribution.

use crate::machine::MachineDescriptor;
use crate::tokens::{Line, Token, TokenKind};

/// Field positions in a canonical line (no `Eol`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicPath<'l> {
    pub operator: &'l Token,
    pub system: &'l Token,
    pub comparator: Option<&'l Token>,
    pub version: &'l Token,
    pub architecture: &'l Token,
    pub value: &'l Token,
}

impl<'l> LogicPath<'l> {
    /// Split a canonical 5- or 6-token line; `None` for any other shape
    pub fn from_line(line: &'l Line) -> Option<Self> {
        match line.as_slice() {
            [operator, system, version, architecture, value] => Some(Self {
                operator,
                system,
                comparator: None,
                version,
                architecture,
                value,
            }),
            [operator, system, comparator, version, architecture, value] => Some(Self {
                operator,
                system,
                comparator: Some(comparator),
                version,
                architecture,
                value,
            }),
            _ => None,
        }
    }

    pub fn matches(&self, text: &str, machine: &MachineDescriptor) -> bool {
        system_matches(self.system, text, machine)
            && version_matches(self.comparator, self.version, text, machine)
            && field_matches(self.architecture, text, machine.processor_architecture.as_deref())
    }
}

/// Whether a canonical logic-path line applies to `machine`
pub fn matches(line: &Line, text: &str, machine: &MachineDescriptor) -> bool {
    LogicPath::from_line(line).is_some_and(|path| path.matches(text, machine))
}

fn field_matches(token: &Token, text: &str, field: Option<&str>) -> bool {
    match token.kind {
        TokenKind::WildcardKeyword => true,
        TokenKind::DefinedKeyword => field.is_some(),
        _ => field == Some(token.text(text)),
    }
}

fn system_matches(token: &Token, text: &str, machine: &MachineDescriptor) -> bool {
    if !machine.is_linux() {
        return field_matches(token, text, machine.system_name.as_deref());
    }

    match token.kind {
        TokenKind::WildcardKeyword => true,
        TokenKind::DefinedKeyword => machine.distro_name.is_some(),
        _ => {
            let candidate = Some(token.text(text));
            machine.system_name.as_deref() == candidate
                || machine.distro_name.as_deref() == candidate
                || machine.distro_family.as_deref() == candidate
        }
    }
}

fn version_matches(
    comparator: Option<&Token>,
    token: &Token,
    text: &str,
    machine: &MachineDescriptor,
) -> bool {
    let literal = token.text(text);

    let Some(comparator) = comparator else {
        return match token.kind {
            TokenKind::WildcardKeyword => true,
            TokenKind::DefinedKeyword => machine.system_version.is_some(),
            _ => machine.version_text_is(literal),
        };
    };

    match comparator.kind {
        TokenKind::EqualTo => machine.version_text_is(literal),
        TokenKind::NotEqualTo => !machine.version_text_is(literal),
        kind => {
            let (Some(actual), Ok(expected)) = (machine.system_version, literal.parse::<i32>())
            else {
                return false;
            };
            match kind {
                TokenKind::LessThan => actual < expected,
                TokenKind::GreaterThan => actual > expected,
                TokenKind::LessThanOrEqualTo => actual <= expected,
                TokenKind::GreaterThanOrEqualTo => actual >= expected,
                _ => false,
            }
        }
    }
}
