use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Per-boundary text attributes.
///
/// Entry `i` describes the boundary before character `i`; the array has one
/// extra entry for the position after the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogAttr {
    /// A line may be broken here.
    pub is_line_break: bool,
    /// A line must be broken here.
    pub is_mandatory_break: bool,
    pub is_char_break: bool,
    /// The character after the boundary is whitespace.
    pub is_white: bool,
    /// The cursor may rest here (grapheme boundary).
    pub is_cursor_position: bool,
    pub is_word_start: bool,
    pub is_word_end: bool,
    pub is_sentence_boundary: bool,
    /// Backspace here deletes one character rather than a whole grapheme.
    pub backspace_deletes_character: bool,
    /// The character after the boundary is a space that justification may widen.
    pub is_expandable_space: bool,
    pub is_word_boundary: bool,
}

/// Compute log attrs for `text`: one entry per character plus a sentinel.
pub fn compute_log_attrs(text: &str) -> Vec<LogAttr> {
    let starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let n = starts.len();
    let offset_of = |byte: usize| starts.binary_search(&byte).unwrap_or(n);
    let mut attrs = vec![LogAttr::default(); n + 1];

    for (offset, ch) in text.chars().enumerate() {
        attrs[offset].is_white = ch.is_whitespace();
        attrs[offset].is_expandable_space = ch == ' ' || ch == '\u{00A0}';
    }

    for (byte, _) in text.grapheme_indices(true) {
        let attr = &mut attrs[offset_of(byte)];
        attr.is_cursor_position = true;
        attr.is_char_break = true;
    }

    for (byte, opportunity) in linebreaks(text) {
        let attr = &mut attrs[offset_of(byte)];
        attr.is_line_break = true;
        attr.is_mandatory_break = opportunity == BreakOpportunity::Mandatory;
    }

    for (byte, segment) in text.split_word_bound_indices() {
        let start = offset_of(byte);
        let end = offset_of(byte + segment.len());
        attrs[start].is_word_boundary = true;
        attrs[end].is_word_boundary = true;
        if segment.chars().any(char::is_alphanumeric) {
            attrs[start].is_word_start = true;
            attrs[end].is_word_end = true;
        }
    }

    for (byte, _) in text.split_sentence_bound_indices() {
        attrs[offset_of(byte)].is_sentence_boundary = true;
    }

    for attr in attrs.iter_mut().skip(1) {
        attr.backspace_deletes_character = attr.is_cursor_position;
    }

    let sentinel = &mut attrs[n];
    sentinel.is_cursor_position = true;
    sentinel.is_char_break = true;
    sentinel.is_line_break = true;
    sentinel.is_mandatory_break = true;
    sentinel.is_word_boundary = true;
    sentinel.is_sentence_boundary = true;
    sentinel.backspace_deletes_character = true;

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_chars_plus_one() {
        assert_eq!(compute_log_attrs("").len(), 1);
        assert_eq!(compute_log_attrs("héllo").len(), 6);
    }

    #[test]
    fn test_combining_mark_is_not_cursor_position() {
        let attrs = compute_log_attrs("e\u{301}x");
        assert!(attrs[0].is_cursor_position);
        assert!(!attrs[1].is_cursor_position);
        assert!(attrs[2].is_cursor_position);
        assert!(attrs[3].is_cursor_position);
    }

    #[test]
    fn test_expandable_spaces() {
        let attrs = compute_log_attrs("a b\u{00A0}c\td");
        assert!(attrs[1].is_expandable_space);
        assert!(attrs[3].is_expandable_space);
        assert!(!attrs[5].is_expandable_space);
        assert!(attrs[5].is_white);
    }

    #[test]
    fn test_line_breaks() {
        let attrs = compute_log_attrs("ab cd\nef");
        assert!(!attrs[0].is_line_break);
        assert!(attrs[3].is_line_break);
        assert!(!attrs[3].is_mandatory_break);
        assert!(attrs[6].is_mandatory_break);
        assert!(attrs[8].is_mandatory_break);
    }

    #[test]
    fn test_word_boundaries() {
        let attrs = compute_log_attrs("hi there");
        assert!(attrs[0].is_word_start);
        assert!(attrs[2].is_word_end);
        assert!(attrs[3].is_word_start);
        assert!(attrs[8].is_word_end);
        assert!(!attrs[1].is_word_boundary);
    }
}
