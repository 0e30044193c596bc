//! Fixed-capacity token line

use super::token::{Token, TokenKind};
use std::fmt;
use thiserror::Error;

/// No legal RSML line needs more than eight tokens
pub const LINE_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("line holds at most {} tokens", LINE_CAPACITY)]
pub struct LineOverflow;

/// Eight token slots; occupied slots are always a contiguous prefix.
///
/// Empty slots hold [`Token::EMPTY`]. Storage is reused across lines via
/// [`Line::clear`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Line {
    slots: [Token; LINE_CAPACITY],
    len: usize,
}

impl Line {
    pub const fn new() -> Self {
        Self {
            slots: [Token::EMPTY; LINE_CAPACITY],
            len: 0,
        }
    }

    pub fn from_tokens(tokens: &[Token]) -> Result<Self, LineOverflow> {
        let mut line = Self::new();
        for token in tokens {
            line.push(*token)?;
        }
        Ok(line)
    }

    /// Build from raw slots (e.g. a C struct), dropping empty slots so the
    /// occupied ones form a prefix
    pub fn from_slots(slots: [Token; LINE_CAPACITY]) -> Self {
        let mut line = Self::new();
        for token in slots.into_iter().filter(|t| !t.is_empty_slot()) {
            line.slots[line.len] = token;
            line.len += 1;
        }
        line
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == LINE_CAPACITY
    }

    pub fn push(&mut self, token: Token) -> Result<(), LineOverflow> {
        if self.is_full() {
            return Err(LineOverflow);
        }
        self.slots[self.len] = token;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Token> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(std::mem::replace(&mut self.slots[self.len], Token::EMPTY))
    }

    /// Insert at `index`, shifting later tokens right
    pub fn insert(&mut self, index: usize, token: Token) -> Result<(), LineOverflow> {
        if self.is_full() {
            return Err(LineOverflow);
        }
        let index = index.min(self.len);
        self.slots.copy_within(index..self.len, index + 1);
        self.slots[index] = token;
        self.len += 1;
        Ok(())
    }

    /// Remove at `index`, shifting later tokens left
    pub fn remove(&mut self, index: usize) -> Option<Token> {
        if index >= self.len {
            return None;
        }
        let removed = self.slots[index];
        self.slots.copy_within(index + 1..self.len, index);
        self.len -= 1;
        self.slots[self.len] = Token::EMPTY;
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.slots = [Token::EMPTY; LINE_CAPACITY];
        self.len = 0;
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.as_slice().get(index)
    }

    /// Kind at `index`, `UndefinedToken` past the end
    pub fn kind(&self, index: usize) -> TokenKind {
        self.get(index)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::UndefinedToken)
    }

    pub fn first(&self) -> Option<&Token> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&Token> {
        self.as_slice().last()
    }

    pub fn ends_with_eol(&self) -> bool {
        self.last().is_some_and(|t| t.kind == TokenKind::Eol)
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.slots[..self.len]
    }

    /// All eight slots, empty ones included
    pub fn slots(&self) -> &[Token; LINE_CAPACITY] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.as_slice().iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.iter().map(|token| token.kind)
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a Line {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TextRange;
    use assert_matches::assert_matches;

    fn tok(kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(kind, TextRange::new(start, end))
    }

    #[test]
    fn test_push_until_full() {
        let mut line = Line::new();
        for i in 0..LINE_CAPACITY {
            line.push(tok(TokenKind::UndefinedToken, i, i + 1)).unwrap();
        }
        assert!(line.is_full());
        assert_matches!(line.push(Token::synthetic(TokenKind::Eol)), Err(LineOverflow));
        assert_eq!(line.len(), LINE_CAPACITY);
    }

    #[test]
    fn test_remove_keeps_prefix_contiguous() {
        let mut line = Line::from_tokens(&[
            tok(TokenKind::ReturnOperator, 0, 2),
            tok(TokenKind::SystemName, 3, 8),
            tok(TokenKind::LogicPathValue, 9, 12),
        ])
        .unwrap();

        let removed = line.remove(1).unwrap();
        assert_eq!(removed.kind, TokenKind::SystemName);
        assert_eq!(line.len(), 2);
        assert_eq!(line.kind(1), TokenKind::LogicPathValue);
        assert!(line.slots()[2].is_empty_slot());
        assert_eq!(line.remove(5), None);
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut line = Line::from_tokens(&[
            tok(TokenKind::ReturnOperator, 0, 2),
            tok(TokenKind::LogicPathValue, 3, 6),
        ])
        .unwrap();

        line.insert(1, Token::synthetic(TokenKind::WildcardKeyword))
            .unwrap();
        let kinds: Vec<_> = line.kinds().collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ReturnOperator,
                TokenKind::WildcardKeyword,
                TokenKind::LogicPathValue
            ]
        );
    }

    #[test]
    fn test_from_slots_compacts_gaps() {
        let mut slots = [Token::EMPTY; LINE_CAPACITY];
        slots[0] = tok(TokenKind::CommentSymbol, 0, 1);
        slots[3] = tok(TokenKind::CommentText, 2, 5);

        let line = Line::from_slots(slots);
        assert_eq!(line.len(), 2);
        assert_eq!(line.kind(1), TokenKind::CommentText);
    }

    #[test]
    fn test_kind_past_end_is_undefined() {
        let line = Line::new();
        assert_eq!(line.kind(0), TokenKind::UndefinedToken);
        assert_eq!(line.kind(100), TokenKind::UndefinedToken);
        assert!(line.first().is_none());
    }

    #[test]
    fn test_pop_and_clear() {
        let mut line = Line::from_tokens(&[
            tok(TokenKind::CommentSymbol, 0, 1),
            Token::synthetic(TokenKind::Eol),
        ])
        .unwrap();

        assert!(line.ends_with_eol());
        assert_eq!(line.pop().map(|t| t.kind), Some(TokenKind::Eol));
        assert!(!line.ends_with_eol());

        line.clear();
        assert!(line.is_empty());
        assert!(line.slots().iter().all(Token::is_empty_slot));
    }
}
