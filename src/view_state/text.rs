//! Column-aware text layout for single display rows.
//!
//! All widths are terminal columns (`unicode-width`), not bytes or chars.

use unicode_width::UnicodeWidthChar;

/// Default tab stop distance.
pub const DEFAULT_TAB_SIZE: usize = 8;

/// Replace tabs with spaces up to the next tab stop and drop other control
/// characters, which would corrupt the terminal.
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut expanded = String::with_capacity(text.len());
    let mut col = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let spaces = tab_size - col % tab_size;
            expanded.extend(std::iter::repeat(' ').take(spaces));
            col += spaces;
        } else if ch.is_control() {
            continue;
        } else {
            expanded.push(ch);
            col += ch.width().unwrap_or(0);
        }
    }
    expanded
}

/// Columns occupied by `text`, summed per character like the layout
/// functions in this module.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Longest prefix of `text` fitting in `width` columns.
///
/// A wide character that would straddle the limit is dropped entirely.
pub fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut col = 0;
    for (idx, ch) in text.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if col + ch_width > width {
            return &text[..idx];
        }
        col += ch_width;
    }
    text
}

/// Truncate or right-pad `text` to exactly `width` columns.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let truncated = truncate_to_width(text, width);
    let used = display_width(truncated);
    let mut fitted = String::with_capacity(truncated.len() + width.saturating_sub(used));
    fitted.push_str(truncated);
    fitted.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    fitted
}
