//! Zero-copy tokens: a kind plus a byte range into the cursor's active text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of token kinds. The discriminants are the native ABI encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenKind {
    Eol = 0,
    Eof = 1,
    CommentSymbol = 2,
    CommentText = 3,
    SpecialActionSymbol = 4,
    SpecialActionName = 5,
    SpecialActionArgument = 6,
    ReturnOperator = 7,
    ThrowErrorOperator = 8,
    SystemName = 9,
    ArchitectureIdentifier = 10,
    MajorVersionId = 11,
    WildcardKeyword = 12,
    DefinedKeyword = 13,
    EqualTo = 14,
    NotEqualTo = 15,
    GreaterThan = 16,
    LessThan = 17,
    GreaterThanOrEqualTo = 18,
    LessThanOrEqualTo = 19,
    LogicPathValue = 20,
    UndefinedToken = 21,
}

impl TokenKind {
    const ALL: [TokenKind; 22] = [
        TokenKind::Eol,
        TokenKind::Eof,
        TokenKind::CommentSymbol,
        TokenKind::CommentText,
        TokenKind::SpecialActionSymbol,
        TokenKind::SpecialActionName,
        TokenKind::SpecialActionArgument,
        TokenKind::ReturnOperator,
        TokenKind::ThrowErrorOperator,
        TokenKind::SystemName,
        TokenKind::ArchitectureIdentifier,
        TokenKind::MajorVersionId,
        TokenKind::WildcardKeyword,
        TokenKind::DefinedKeyword,
        TokenKind::EqualTo,
        TokenKind::NotEqualTo,
        TokenKind::GreaterThan,
        TokenKind::LessThan,
        TokenKind::GreaterThanOrEqualTo,
        TokenKind::LessThanOrEqualTo,
        TokenKind::LogicPathValue,
        TokenKind::UndefinedToken,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn is_operator(self) -> bool {
        matches!(self, TokenKind::ReturnOperator | TokenKind::ThrowErrorOperator)
    }

    pub fn is_comparator(self) -> bool {
        matches!(
            self,
            TokenKind::EqualTo
                | TokenKind::NotEqualTo
                | TokenKind::GreaterThan
                | TokenKind::LessThan
                | TokenKind::GreaterThanOrEqualTo
                | TokenKind::LessThanOrEqualTo
        )
    }

    /// Wildcard or defined: placeholders valid in any field slot
    pub fn is_placeholder(self) -> bool {
        matches!(self, TokenKind::WildcardKeyword | TokenKind::DefinedKeyword)
    }

    pub fn is_terminator(self) -> bool {
        matches!(self, TokenKind::Eol | TokenKind::Eof)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eol => "Eol",
            TokenKind::Eof => "Eof",
            TokenKind::CommentSymbol => "CommentSymbol",
            TokenKind::CommentText => "CommentText",
            TokenKind::SpecialActionSymbol => "SpecialActionSymbol",
            TokenKind::SpecialActionName => "SpecialActionName",
            TokenKind::SpecialActionArgument => "SpecialActionArgument",
            TokenKind::ReturnOperator => "ReturnOperator",
            TokenKind::ThrowErrorOperator => "ThrowErrorOperator",
            TokenKind::SystemName => "SystemName",
            TokenKind::ArchitectureIdentifier => "ArchitectureIdentifier",
            TokenKind::MajorVersionId => "MajorVersionId",
            TokenKind::WildcardKeyword => "WildcardKeyword",
            TokenKind::DefinedKeyword => "DefinedKeyword",
            TokenKind::EqualTo => "EqualTo",
            TokenKind::NotEqualTo => "NotEqualTo",
            TokenKind::GreaterThan => "GreaterThan",
            TokenKind::LessThan => "LessThan",
            TokenKind::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
            TokenKind::LessThanOrEqualTo => "LessThanOrEqualTo",
            TokenKind::LogicPathValue => "LogicPathValue",
            TokenKind::UndefinedToken => "UndefinedToken",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range into a text buffer.
///
/// `TextRange::NONE` (start past end) marks synthesized tokens that carry no
/// text; slicing it always yields `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const NONE: TextRange = TextRange {
        start: usize::MAX,
        end: 0,
    };

    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text covered by the range, `""` for the sentinel or out-of-bounds ranges
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        if self.start > self.end {
            return "";
        }
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// A token: kind plus the range of its text in the backing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    /// Empty slot marker used by `Line`
    pub const EMPTY: Token = Token {
        kind: TokenKind::UndefinedToken,
        range: TextRange::NONE,
    };

    pub const fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// A token with no backing text (wildcards and terminators inserted by the pipeline)
    pub const fn synthetic(kind: TokenKind) -> Self {
        Self {
            kind,
            range: TextRange::NONE,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn is_synthetic(&self) -> bool {
        self.range.is_none()
    }

    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        self.range.slice(source)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            write!(f, "{}(synthetic)", self.kind)
        } else {
            write!(f, "{}[{}..{}]", self.kind, self.range.start, self.range.end)
        }
    }
}
