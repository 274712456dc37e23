//! C-family comments: `//` to end of line, `/* ... */` blocks.

use super::{line_end, skip_string, Regions};

pub(super) fn collect(text: &str, regions: &mut Regions<'_>) {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'/', Some(b'/')) => {
                let end = line_end(text, i + 2);
                regions.push(i + 2, end);
                i = end;
            }
            (b'/', Some(b'*')) => {
                let start = i + 2;
                let end = text[start..].find("*/").map_or(text.len(), |n| start + n);
                regions.push(start, end);
                i = (end + 2).min(text.len());
            }
            (b'"', _) => i = skip_string(bytes, i + 1, b'"', true),
            (b'\'', _) => i = skip_char_literal(text, i),
            _ => i += 1,
        }
    }
}

/// `'x'` and `'\n'` are skipped; any other `'` (a Rust lifetime, a stray
/// apostrophe) is ordinary text.
fn skip_char_literal(text: &str, at: usize) -> usize {
    let rest = &text[at + 1..];
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, '\\')) => {
            // Longest escape is `'\u{10FFFF}'`.
            let close = rest[1..]
                .char_indices()
                .skip(1)
                .take(10)
                .find(|&(_, c)| c == '\'');
            match close {
                Some((n, _)) => at + 2 + n + 1,
                None => at + 1,
            }
        }
        Some((_, c)) if c != '\n' => match chars.next() {
            Some((n, '\'')) => at + 1 + n + 1,
            _ => at + 1,
        },
        _ => at + 1,
    }
}
