//! Dual-buffer text cursor
//!
//! The cursor holds two independent buffers: the primary one (a whole
//! document) and the secondary one (a single line copied out of it). The
//! evaluator walks the document on the primary buffer, stages each line into
//! the secondary buffer with [`TextCursor::stage_line`], and hands the same
//! cursor to the lexer, whose token ranges then index the staged line.
//!
//! Positions are byte offsets and always sit on char boundaries. No
//! operation panics on out-of-range input: reads at the end consume nothing
//! and positions are clamped.

use crate::tokens::TextRange;
use std::borrow::Cow;

/// Which backing buffer cursor operations act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBuffer {
    Primary,
    Secondary,
}

#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    primary: Cow<'a, str>,
    primary_pos: usize,
    secondary: Cow<'a, str>,
    secondary_pos: usize,
    active: ActiveBuffer,
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_separator(c: char, treat_newline_as_whitespace: bool) -> bool {
    c.is_whitespace() && (treat_newline_as_whitespace || !is_newline(c))
}

impl<'a> TextCursor<'a> {
    /// Cursor over `text` as the primary buffer, positioned at 0
    pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            primary: text.into(),
            primary_pos: 0,
            secondary: Cow::Owned(String::new()),
            secondary_pos: 0,
            active: ActiveBuffer::Primary,
        }
    }

    pub fn active(&self) -> ActiveBuffer {
        self.active
    }

    /// Text of the active buffer
    pub fn text(&self) -> &str {
        match self.active {
            ActiveBuffer::Primary => self.primary.as_ref(),
            ActiveBuffer::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn position(&self) -> usize {
        match self.active {
            ActiveBuffer::Primary => self.primary_pos,
            ActiveBuffer::Secondary => self.secondary_pos,
        }
    }

    /// Move within the active buffer, clamped to its length and snapped back
    /// to the nearest char boundary
    pub fn set_position(&mut self, position: usize) {
        let text = self.text();
        let mut position = position.min(text.len());
        while !text.is_char_boundary(position) {
            position -= 1;
        }
        *self.position_mut() = position;
    }

    fn position_mut(&mut self) -> &mut usize {
        match self.active {
            ActiveBuffer::Primary => &mut self.primary_pos,
            ActiveBuffer::Secondary => &mut self.secondary_pos,
        }
    }

    pub fn remaining(&self) -> &str {
        &self.text()[self.position()..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position() >= self.text().len()
    }

    /// Resolve a range against the active buffer
    pub fn slice(&self, range: TextRange) -> &str {
        range.slice(self.text())
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        *self.position_mut() += c.len_utf8();
        Some(c)
    }

    /// Read up to `count` characters; fewer when the buffer ends first
    pub fn read_n(&mut self, count: usize) -> TextRange {
        let start = self.position();
        let consumed: usize = self
            .remaining()
            .chars()
            .take(count)
            .map(char::len_utf8)
            .sum();
        *self.position_mut() += consumed;
        TextRange::new(start, start + consumed)
    }

    /// Read the next line. The returned range excludes the `\n` / `\r\n`
    /// terminator, which is consumed. `None` when already at the end.
    pub fn read_line(&mut self) -> Option<TextRange> {
        if self.is_at_end() {
            return None;
        }
        let start = self.position();
        let (content_len, consumed) = match self.remaining().find('\n') {
            Some(newline) => (newline, newline + 1),
            None => {
                let len = self.remaining().len();
                (len, len)
            }
        };
        let mut end = start + content_len;
        if self.text()[start..end].ends_with('\r') {
            end -= 1;
        }
        *self.position_mut() += consumed;
        Some(TextRange::new(start, end))
    }

    /// Consume characters up to and including the first one for which
    /// `predicate(char, index_within_read)` holds, or to the end of the buffer
    pub fn read_until<F>(&mut self, mut predicate: F) -> TextRange
    where
        F: FnMut(char, usize) -> bool,
    {
        let start = self.position();
        let mut consumed = 0;
        for (index, c) in self.remaining().chars().enumerate() {
            consumed += c.len_utf8();
            if predicate(c, index) {
                break;
            }
        }
        *self.position_mut() += consumed;
        TextRange::new(start, start + consumed)
    }

    /// Consume a run of non-whitespace characters; the whitespace is left in place.
    /// When `treat_newline_as_whitespace` is false, line breaks are part of the run.
    pub fn read_until_whitespace(&mut self, treat_newline_as_whitespace: bool) -> TextRange {
        let start = self.position();
        let len = self
            .remaining()
            .find(|c| is_separator(c, treat_newline_as_whitespace))
            .unwrap_or_else(|| self.remaining().len());
        *self.position_mut() += len;
        TextRange::new(start, start + len)
    }

    /// Skip whitespace and return how many bytes were skipped. When
    /// `treat_newline_as_whitespace` is false, stops at a line break.
    pub fn skip_whitespace(&mut self, treat_newline_as_whitespace: bool) -> usize {
        let len = self
            .remaining()
            .find(|c| !is_separator(c, treat_newline_as_whitespace))
            .unwrap_or_else(|| self.remaining().len());
        *self.position_mut() += len;
        len
    }

    /// Rest of the current line, without its `\n` / `\r\n` terminator
    pub fn line_remaining(&self) -> &str {
        let rest = self.remaining();
        let line = rest.find('\n').map_or(rest, |newline| &rest[..newline]);
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// Consume the rest of the current line; the terminator stays in place
    pub fn read_to_line_end(&mut self) -> TextRange {
        let start = self.position();
        let len = self.line_remaining().len();
        *self.position_mut() += len;
        TextRange::new(start, start + len)
    }

    /// Skip whitespace without leaving the current line
    pub fn skip_line_whitespace(&mut self) -> usize {
        let line = self.line_remaining();
        let len = line.len() - line.trim_start().len();
        *self.position_mut() += len;
        len
    }

    /// Consume the rest of the active buffer
    pub fn read_to_end(&mut self) -> TextRange {
        let start = self.position();
        let end = self.text().len();
        *self.position_mut() = end;
        TextRange::new(start, end)
    }

    /// Toggle the active buffer; both positions are preserved
    pub fn swap_buffer(&mut self) {
        self.active = match self.active {
            ActiveBuffer::Primary => ActiveBuffer::Secondary,
            ActiveBuffer::Secondary => ActiveBuffer::Primary,
        };
    }

    /// Replace the active buffer's text and reset its position to 0
    pub fn set_text(&mut self, text: impl Into<Cow<'a, str>>) {
        let text = text.into();
        match self.active {
            ActiveBuffer::Primary => {
                self.primary = text;
                self.primary_pos = 0;
            }
            ActiveBuffer::Secondary => {
                self.secondary = text;
                self.secondary_pos = 0;
            }
        }
    }

    /// Copy `range` of the primary buffer into the secondary buffer (reusing
    /// its allocation) and make the secondary buffer active at position 0
    pub fn stage_line(&mut self, range: TextRange) {
        let line = range.slice(&self.primary);
        let staged = self.secondary.to_mut();
        staged.clear();
        staged.push_str(line);
        self.secondary_pos = 0;
        self.active = ActiveBuffer::Secondary;
    }
}
