//! Character-based text helpers.
//!
//! Lengths, limits and previews are counted in `char`s so a cut never lands
//! inside a multi-byte character.

/// Number of characters in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Single-line preview: newlines flattened, `...` appended when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    let mut out = head.replace('\n', " ");
    if head.len() < text.len() {
        out.push_str("...");
    }
    out
}

/// Collapse every run of whitespace into one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
