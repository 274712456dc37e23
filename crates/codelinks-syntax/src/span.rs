//! Source positions for annotations.
//!
//! [`SourceSpan`] stores byte offsets into the scanned buffer; [`Location`]
//! is the 1-based line/column of a span's start, used for diagnostics.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A byte-offset span into a scanned buffer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceSpan {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift the span by `offset` bytes, e.g. to map a comment-relative
    /// span back into its file.
    pub fn offset_by(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl fmt::Debug for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// 1-based line and column (in characters) of a position in a buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Translate a location relative to an embedded region into the
    /// enclosing buffer, given where the region itself starts.
    ///
    /// Only the first line of the region shares its column origin with the
    /// enclosing buffer.
    pub fn relative_to(self, origin: Location) -> Self {
        if self.line == 1 {
            Self {
                line: origin.line,
                column: origin.column + self.column - 1,
            }
        } else {
            Self {
                line: origin.line + self.line - 1,
                column: self.column,
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
