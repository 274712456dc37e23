//! Comment isolation — dispatch by file extension.
//!
//! Annotations live in comments. Each isolator returns the comment bodies of
//! a file as [`TextRegion`]s, so that positions reported by the scanner are
//! positions in the file. String literals are skipped; adjacent line
//! comments are separate regions.

mod hash;
mod slash;

use codelinks_syntax::{Location, TextRegion};
use std::path::Path;

/// `//` line and `/* */` block comments.
pub const SLASH_EXTENSIONS: &[&str] = &[
    "c", "h", "cc", "cpp", "hpp", "rs", "js", "ts", "java", "go", "kt", "swift",
];

/// `#` line comments anywhere outside a string.
pub const HASH_EXTENSIONS: &[&str] = &["py", "toml", "yaml", "yml"];

/// `#` line comments at the start of a word.
pub const SHELL_EXTENSIONS: &[&str] = &["sh", "bash"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Slash,
    Hash,
    Shell,
}

impl Syntax {
    pub fn from_extension(ext: &str) -> Option<Self> {
        if SLASH_EXTENSIONS.contains(&ext) {
            Some(Syntax::Slash)
        } else if HASH_EXTENSIONS.contains(&ext) {
            Some(Syntax::Hash)
        } else if SHELL_EXTENSIONS.contains(&ext) {
            Some(Syntax::Shell)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Every extension with a comment isolator.
pub fn supported_extensions() -> Vec<String> {
    SLASH_EXTENSIONS
        .iter()
        .chain(HASH_EXTENSIONS)
        .chain(SHELL_EXTENSIONS)
        .map(|ext| ext.to_string())
        .collect()
}

/// The comment bodies of `text`, in file order.
pub fn isolate(text: &str, syntax: Syntax) -> Vec<TextRegion<'_>> {
    let mut regions = Regions::new(text);
    match syntax {
        Syntax::Slash => slash::collect(text, &mut regions),
        Syntax::Hash => hash::collect(text, false, &mut regions),
        Syntax::Shell => hash::collect(text, true, &mut regions),
    }
    regions.finish()
}

/// Collects regions in increasing offset order, tracking lines as it goes.
pub(crate) struct Regions<'a> {
    text: &'a str,
    regions: Vec<TextRegion<'a>>,
    line: usize,
    line_start: usize,
    counted_to: usize,
}

impl<'a> Regions<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            regions: Vec::new(),
            line: 1,
            line_start: 0,
            counted_to: 0,
        }
    }

    pub(crate) fn push(&mut self, start: usize, end: usize) {
        for (i, b) in self.text.as_bytes()[self.counted_to..start].iter().enumerate() {
            if *b == b'\n' {
                self.line += 1;
                self.line_start = self.counted_to + i + 1;
            }
        }
        self.counted_to = start;
        let column = self.text[self.line_start..start].chars().count() + 1;
        self.regions.push(TextRegion {
            text: &self.text[start..end],
            byte_offset: start,
            origin: Location::new(self.line, column),
        });
    }

    fn finish(self) -> Vec<TextRegion<'a>> {
        self.regions
    }
}

/// End of the line containing `from` (the offset of its `\n`, or the end).
pub(crate) fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |n| from + n)
}

/// Skip a quoted string starting after the opening `quote` at `from`.
///
/// Strings end at the closing quote or, unterminated, at the end of the
/// line. Returns the offset just past the string.
pub(crate) fn skip_string(bytes: &[u8], from: usize, quote: u8, escapes: bool) -> usize {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if escapes => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(text: &str, syntax: Syntax) -> Vec<&str> {
        isolate(text, syntax).iter().map(|r| r.text).collect()
    }

    #[test]
    fn syntax_by_extension() {
        assert_eq!(Syntax::from_path(Path::new("src/a.rs")), Some(Syntax::Slash));
        assert_eq!(Syntax::from_path(Path::new("a.py")), Some(Syntax::Hash));
        assert_eq!(Syntax::from_path(Path::new("run.sh")), Some(Syntax::Shell));
        assert_eq!(Syntax::from_path(Path::new("notes.txt")), None);
        assert_eq!(Syntax::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn region_origins_are_file_positions() {
        let text = "int x;\n  // note\n/* a\n b */";
        let regions = isolate(text, Syntax::Slash);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].origin, Location::new(2, 5));
        assert_eq!(regions[0].byte_offset, 11);
        assert_eq!(regions[1].origin, Location::new(3, 3));
        assert_eq!(regions[1].text, " a\n b ");
    }

    #[test]
    fn columns_count_characters() {
        let regions = isolate("é // x", Syntax::Slash);
        assert_eq!(regions[0].origin, Location::new(1, 5));
    }

    #[test]
    fn unterminated_string_ends_at_line() {
        let text = "s = \"open\n# [[A, a]]";
        assert_eq!(bodies(text, Syntax::Hash), vec![" [[A, a]]"]);
    }

    #[test]
    fn supported_extensions_cover_all_families() {
        let all = supported_extensions();
        assert!(all.iter().any(|e| e == "rs"));
        assert!(all.iter().any(|e| e == "py"));
        assert!(all.iter().any(|e| e == "bash"));
    }
}
