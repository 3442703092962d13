use crate::error::{LayoutError, Result};
use crate::text::attrs::AttrList;
use crate::text::direction::Direction;
use crate::text::log_attrs::{compute_log_attrs, LogAttr};

/// Immutable paragraph storage shared by the lines laid out from it.
///
/// Lines hold it behind an `Arc`; a paragraph wrapped into several lines
/// shares one `LineData` with different byte windows.
#[derive(Debug)]
pub struct LineData {
    text: String,
    direction: Direction,
    attrs: AttrList,
    log_attrs: Vec<LogAttr>,
    /// Byte offset of every character, plus `text.len()`.
    char_starts: Vec<usize>,
}

impl LineData {
    /// Create paragraph data, computing log attrs from the text.
    pub fn new(text: impl Into<String>, direction: Direction, attrs: AttrList) -> Self {
        let text = text.into();
        let log_attrs = compute_log_attrs(&text);
        let char_starts = char_starts(&text);
        Self {
            text,
            direction,
            attrs,
            log_attrs,
            char_starts,
        }
    }

    /// Create paragraph data with log attrs from an external analyzer.
    pub fn with_log_attrs(
        text: impl Into<String>,
        direction: Direction,
        attrs: AttrList,
        log_attrs: Vec<LogAttr>,
    ) -> Result<Self> {
        let text = text.into();
        let char_starts = char_starts(&text);
        if log_attrs.len() != char_starts.len() {
            return Err(LayoutError::LogAttrsLength {
                expected: char_starts.len(),
                found: log_attrs.len(),
            });
        }
        Ok(Self {
            text,
            direction,
            attrs,
            log_attrs,
            char_starts,
        })
    }

    /// Plain text with its base direction detected from the content.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let direction = Direction::detect(&text);
        Self::new(text, direction, AttrList::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn n_chars(&self) -> usize {
        self.char_starts.len() - 1
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn attrs(&self) -> &AttrList {
        &self.attrs
    }

    /// One entry per character plus a trailing sentinel.
    pub fn log_attrs(&self) -> &[LogAttr] {
        &self.log_attrs
    }

    pub fn is_char_boundary(&self, index: usize) -> bool {
        self.text.is_char_boundary(index)
    }

    /// Character offset of byte `index`, which must be a character boundary.
    pub fn char_offset(&self, index: usize) -> usize {
        self.char_starts.partition_point(|&start| start < index)
    }

    /// Byte index of character `offset`; `n_chars()` maps to the text length.
    pub fn char_index(&self, offset: usize) -> usize {
        self.char_starts[offset.min(self.n_chars())]
    }

    /// Byte index of the character after the one at `index`.
    pub fn next_char(&self, index: usize) -> usize {
        self.char_index(self.char_offset(index) + 1)
    }

    /// Byte index of the character before `index`, or 0 at the start.
    pub fn prev_char(&self, index: usize) -> usize {
        match self.char_offset(index) {
            0 => 0,
            offset => self.char_starts[offset - 1],
        }
    }
}

fn char_starts(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}
