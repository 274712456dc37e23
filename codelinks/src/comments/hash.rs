//! `#` line comments (Python, TOML, YAML, shell).

use super::{line_end, skip_string, Regions};

/// In shell, `#` opens a comment only at the start of a word, so `$#` and
/// `${#list[@]}` are code.
pub(super) fn collect(text: &str, word_start: bool, regions: &mut Regions<'_>) {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'#' if !word_start || i == 0 || starts_word(bytes[i - 1]) => {
                let end = line_end(text, i + 1);
                regions.push(i + 1, end);
                i = end;
            }
            b'"' => i = skip_string(bytes, i + 1, b'"', true),
            // Single-quoted shell strings have no escapes.
            b'\'' => i = skip_string(bytes, i + 1, b'\'', !word_start),
            _ => i += 1,
        }
    }
}

fn starts_word(prev: u8) -> bool {
    matches!(prev, b' ' | b'\t' | b'\r' | b'\n' | b';' | b'&' | b'|' | b'(')
}
