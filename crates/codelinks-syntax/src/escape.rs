//! Escape handling shared by every stage.
//!
//! A backslash escapes the next character when that character is one of
//! `,` `[` `]` `\`. Escaped characters never take a structural part (depth,
//! splitting, termination). Any other backslash is an ordinary character.
//! All structural characters are ASCII, so scanning works on bytes without
//! ever splitting a UTF-8 sequence.

pub const ESCAPE: u8 = b'\\';

/// Characters a backslash can escape.
pub const ESCAPABLE: &[u8] = b",[]\\";

pub fn is_escapable(byte: u8) -> bool {
    ESCAPABLE.contains(&byte)
}

/// Iterator over the unescaped bytes of a string, with their byte offsets.
///
/// Escape sequences (`\,` `\[` `\]` `\\`) are skipped entirely; they are
/// data, not structure.
#[derive(Clone)]
pub struct Unescaped<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Unescaped<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for Unescaped<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let byte = *self.bytes.get(self.pos)?;
            if byte == ESCAPE {
                if let Some(&next) = self.bytes.get(self.pos + 1) {
                    if is_escapable(next) {
                        self.pos += 2;
                        continue;
                    }
                }
            }
            let item = (self.pos, byte);
            self.pos += 1;
            return Some(item);
        }
    }
}

/// Replace every escape sequence with the character it escapes.
///
/// `title\, more` → `title, more`; `\[x\]` → `[x]`; `a\b` stays `a\b`.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii() && is_escapable(next as u8) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

/// Bracket balance of the unescaped characters in `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Balanced,
    /// A `]` closed more than was opened.
    Underflow,
    /// Some `[` were never closed.
    Unclosed,
}

pub fn bracket_balance(text: &str) -> Balance {
    let mut depth = 0usize;
    for (_, byte) in Unescaped::new(text) {
        match byte {
            b'[' => depth += 1,
            b']' => {
                if depth == 0 {
                    return Balance::Underflow;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth == 0 {
        Balance::Balanced
    } else {
        Balance::Unclosed
    }
}
