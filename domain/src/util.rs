//! Shared utility functions.

use std::borrow::Cow;

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`.
///
/// Counts characters, not bytes, so multi-byte text is never split inside a
/// code point. Text that already fits is borrowed unchanged.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some(_) if max_chars == 0 => Cow::Borrowed(""),
        Some(_) => {
            let cut = text
                .char_indices()
                .nth(max_chars - 1)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            Cow::Owned(format!("{}…", text[..cut].trim_end()))
        }
    }
}
