//! Closed vocabularies of the RSML language

use super::token::TokenKind;

pub const RETURN_OPERATOR: &str = "->";
pub const THROW_ERROR_OPERATOR: &str = "!>";

pub const COMMENT_SYMBOL: char = '#';
pub const SPECIAL_ACTION_SYMBOL: char = '@';
pub const VALUE_QUOTE: char = '"';

pub const WILDCARD_KEYWORD: &str = "any";
pub const DEFINED_KEYWORD: &str = "defined";

/// Valid system names (matched case-insensitively)
pub const SYSTEMS: [&str; 8] = [
    "windows",
    "osx",
    "linux",
    "freebsd",
    "debian",
    "ubuntu",
    "archlinux",
    "fedora",
];

/// Valid processor architectures (matched case-insensitively)
pub const ARCHITECTURES: [&str; 5] = ["x64", "x86", "arm64", "arm32", "loongarch64"];

pub const COMPARATORS: [(&str, TokenKind); 6] = [
    ("==", TokenKind::EqualTo),
    ("!=", TokenKind::NotEqualTo),
    ("<", TokenKind::LessThan),
    (">", TokenKind::GreaterThan),
    ("<=", TokenKind::LessThanOrEqualTo),
    (">=", TokenKind::GreaterThanOrEqualTo),
];

/// Built-in special actions
pub mod actions {
    pub const VOID: &str = "Void";
    pub const THROW_ERROR: &str = "ThrowError";
    pub const END_ALL: &str = "EndAll";

    pub const BUILT_IN: [&str; 3] = [VOID, THROW_ERROR, END_ALL];

    pub fn is_built_in(name: &str) -> bool {
        BUILT_IN.contains(&name)
    }
}

pub fn is_system_name(text: &str) -> bool {
    SYSTEMS.iter().any(|s| s.eq_ignore_ascii_case(text))
}

pub fn is_architecture(text: &str) -> bool {
    ARCHITECTURES.iter().any(|a| a.eq_ignore_ascii_case(text))
}

pub fn operator_kind(text: &str) -> Option<TokenKind> {
    match text {
        RETURN_OPERATOR => Some(TokenKind::ReturnOperator),
        THROW_ERROR_OPERATOR => Some(TokenKind::ThrowErrorOperator),
        _ => None,
    }
}

pub fn comparator_kind(text: &str) -> Option<TokenKind> {
    COMPARATORS
        .iter()
        .find(|(symbol, _)| *symbol == text)
        .map(|(_, kind)| *kind)
}

pub fn comparator_symbol(kind: TokenKind) -> Option<&'static str> {
    COMPARATORS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(symbol, _)| *symbol)
}

/// Canonical text for tokens that may be synthesized without source text
pub fn synthetic_text(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::WildcardKeyword => Some(WILDCARD_KEYWORD),
        TokenKind::DefinedKeyword => Some(DEFINED_KEYWORD),
        TokenKind::ReturnOperator => Some(RETURN_OPERATOR),
        TokenKind::ThrowErrorOperator => Some(THROW_ERROR_OPERATOR),
        kind => comparator_symbol(kind),
    }
}

/// Parse a major version the way the validator accepts it (32-bit signed)
pub fn parse_major_version(text: &str) -> Option<i32> {
    text.parse::<i32>().ok()
}

/// Custom special-action names: non-empty, alphanumeric or underscore
pub fn is_well_formed_action_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabularies_are_case_insensitive() {
        assert!(is_system_name("Windows"));
        assert!(is_system_name("ARCHLINUX"));
        assert!(!is_system_name("solaris"));
        assert!(is_architecture("ARM64"));
        assert!(!is_architecture("sparc"));
    }

    #[test]
    fn test_comparators_round_trip() {
        for (symbol, kind) in COMPARATORS {
            assert_eq!(comparator_kind(symbol), Some(kind));
            assert_eq!(comparator_symbol(kind), Some(symbol));
        }
        assert_eq!(comparator_kind("=>"), None);
    }

    #[test]
    fn test_operator_kinds() {
        assert_eq!(operator_kind("->"), Some(TokenKind::ReturnOperator));
        assert_eq!(operator_kind("!>"), Some(TokenKind::ThrowErrorOperator));
        assert_eq!(operator_kind("=>"), None);
    }

    #[test]
    fn test_major_version_parsing() {
        assert_eq!(parse_major_version("10"), Some(10));
        assert_eq!(parse_major_version("-1"), Some(-1));
        assert_eq!(parse_major_version("99999999999"), None);
        assert_eq!(parse_major_version("ten"), None);
    }

    #[test]
    fn test_action_names() {
        assert!(actions::is_built_in("EndAll"));
        assert!(!actions::is_built_in("endall"));
        assert!(is_well_formed_action_name("Print_2"));
        assert!(!is_well_formed_action_name(""));
        assert!(!is_well_formed_action_name("bad-name"));
    }
}
