#![forbid(unsafe_code)]

//! Grapheme-aware width and offset helpers.
//!
//! Every cut made by the fitting engine lands on an extended grapheme
//! cluster boundary, so an emoji, ZWJ sequence or combining sequence is
//! never split. Widths are measured in terminal cells (CJK and most emoji
//! are 2 cells wide).
//!
//! # Example
//! ```
//! use lineclamp_text::width::{display_width, grapheme_count, grapheme_prefix};
//!
//! assert_eq!(display_width("你好"), 4);
//! assert_eq!(grapheme_count("e\u{301}tude"), 5);
//! assert_eq!(grapheme_prefix("hello", 3), "hel");
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Calculate the display width of text in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Width of a single grapheme cluster in cells.
///
/// Zero-width clusters (lone combining marks, control characters) report 0.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    grapheme.width()
}

/// Iterate over extended grapheme clusters.
#[inline]
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Number of extended grapheme clusters in `text`.
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    if text.is_ascii() {
        // \r\n is a single cluster; everything else in ASCII is one byte each.
        return text.len() - text.matches("\r\n").count();
    }
    text.graphemes(true).count()
}

/// The longest prefix of `text` holding at most `count` grapheme clusters.
#[must_use]
pub fn grapheme_prefix(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }
    match text.grapheme_indices(true).nth(count) {
        Some((byte_pos, _)) => &text[..byte_pos],
        None => text,
    }
}

/// The remainder of `text` after its first `count` grapheme clusters.
#[must_use]
pub fn grapheme_suffix(text: &str, count: usize) -> &str {
    let prefix = grapheme_prefix(text, count);
    &text[prefix.len()..]
}
