//! Escape-aware lexer: locate `[[ ... ]]` annotation spans in raw text.
//!
//! The lexer walks the buffer one byte at a time with an explicit depth
//! counter instead of matching a greedy pattern, so Links lists with nested
//! brackets (`[SPEC_1, SPEC_2[text]]`) never end an annotation early.
//!
//! - an unescaped `[[` opens an annotation;
//! - inside, `[` increments depth and `]` at depth > 0 decrements it;
//! - `]]` at depth 0 closes the annotation;
//! - a lone `]` at depth 0 is data;
//! - an opener without a closer yields [`AnnotationError::UnterminatedAnnotation`]
//!   and scanning resumes right after that opener.
//!
//! Closers for all openers are resolved in a single pass when the lexer is
//! created, so a run of unclosed openers costs linear time overall.

use crate::error::AnnotationError;
use crate::escape::{is_escapable, ESCAPE};
use crate::model::Rejected;
use crate::span::{Location, SourceSpan};
use std::collections::{HashMap, VecDeque};

/// A located `[[ ... ]]` region of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationSpan<'a> {
    /// The whole annotation, brackets included.
    pub span: SourceSpan,
    /// The text between the outer `[[` and `]]`.
    pub inner: SourceSpan,
    /// Borrowed inner text, still escaped.
    pub text: &'a str,
    /// Position of the opening `[[`.
    pub location: Location,
}

/// Lazy iterator over the annotation spans of a buffer.
///
/// A clone continues from the same position. Call [`Lexer::new`] on the
/// same text to scan again from the beginning.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    // Incremental line tracking so locations cost O(n) over the whole scan.
    line: usize,
    column: usize,
    counted_to: usize,
    closers: HashMap<usize, usize>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
            counted_to: 0,
            closers: resolve_closers(text),
        }
    }

    fn location(&mut self, offset: usize) -> Location {
        for c in self.text[self.counted_to..offset].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.counted_to = offset;
        Location::new(self.line, self.column)
    }

    /// Find the next unescaped `[[` at or after `from`.
    fn find_opener(&self, from: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                ESCAPE if bytes.get(i + 1).is_some_and(|&b| is_escapable(b)) => i += 2,
                b'[' if bytes.get(i + 1) == Some(&b'[') => return Some(i),
                _ => i += 1,
            }
        }
        None
    }
}

/// Live scans that currently sit at the same depth.
#[derive(Debug)]
struct ScanGroup {
    /// How much deeper this group is than the group above it.
    gap: usize,
    openers: Vec<usize>,
}

/// Resolve the closing `]]` of every opener in one pass over `text`.
///
/// A scan started at a later opener is never deeper than one started
/// earlier, and two scans at the same depth stay together until they close.
/// Live scans are therefore kept as a stack of groups ordered by depth, with
/// only the top group's depth stored explicitly. Openers missing from the
/// result have no closer.
fn resolve_closers(text: &str) -> HashMap<usize, usize> {
    let bytes = text.as_bytes();
    let mut closers = HashMap::new();
    let mut pending: VecDeque<usize> = VecDeque::new();
    let mut groups: Vec<ScanGroup> = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        while let Some(&opener) = pending.front() {
            if opener + 2 > i {
                break;
            }
            pending.pop_front();
            match groups.last_mut() {
                Some(top) if depth == 0 => top.openers.push(opener),
                Some(top) => {
                    top.gap = depth;
                    depth = 0;
                    groups.push(ScanGroup { gap: 0, openers: vec![opener] });
                }
                None => {
                    depth = 0;
                    groups.push(ScanGroup { gap: 0, openers: vec![opener] });
                }
            }
        }

        match bytes[i] {
            ESCAPE if bytes.get(i + 1).is_some_and(|&b| is_escapable(b)) => {
                i += 2;
                continue;
            }
            b'[' => {
                depth += 1;
                if bytes.get(i + 1) == Some(&b'[') {
                    pending.push_back(i);
                }
            }
            b']' if depth > 0 => depth -= 1,
            b']' if bytes.get(i + 1) == Some(&b']') => {
                if let Some(closed) = groups.pop() {
                    for opener in closed.openers {
                        closers.insert(opener, i);
                    }
                }
                // Every remaining scan is deeper and takes this `]` as a decrement.
                if let Some(top) = groups.last_mut() {
                    depth = top.gap - 1;
                    top.gap = 0;
                }
            }
            b']' => {
                // The top stays at depth 0 while the group below moves up.
                let n = groups.len();
                if n >= 2 {
                    groups[n - 2].gap -= 1;
                    if groups[n - 2].gap == 0 {
                        if let Some(mut top) = groups.pop() {
                            if let Some(below) = groups.last_mut() {
                                if below.openers.len() < top.openers.len() {
                                    std::mem::swap(&mut below.openers, &mut top.openers);
                                }
                                below.openers.append(&mut top.openers);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    closers
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<AnnotationSpan<'a>, Rejected>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.find_opener(self.pos)?;
        let inner_start = start + 2;
        let location = self.location(start);

        match self.closers.get(&start).copied() {
            Some(close) => {
                self.pos = close + 2;
                Some(Ok(AnnotationSpan {
                    span: SourceSpan::new(start, close + 2),
                    inner: SourceSpan::new(inner_start, close),
                    text: &self.text[inner_start..close],
                    location,
                }))
            }
            None => {
                self.pos = inner_start;
                Some(Err(Rejected {
                    error: AnnotationError::UnterminatedAnnotation,
                    span: SourceSpan::new(start, self.text.len()),
                    location,
                }))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
