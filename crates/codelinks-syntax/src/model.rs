//! Parsed annotation records.

use crate::error::AnnotationError;
use crate::span::{Location, SourceSpan};
use serde::Serialize;
use std::collections::BTreeSet;

/// A validated `[[ID, Title, Type, Links, Status]]` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationRecord {
    pub id: String,
    pub title: String,
    /// The Type field.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Specification items this implementation item claims to satisfy.
    pub links: BTreeSet<String>,
    pub status: Option<String>,
    pub span: SourceSpan,
    pub location: Location,
}

impl AnnotationRecord {
    /// Shift span and location so they point into an enclosing buffer.
    pub fn relocate(mut self, byte_offset: usize, origin: Location) -> Self {
        self.span = self.span.offset_by(byte_offset);
        self.location = self.location.relative_to(origin);
        self
    }
}

/// An annotation span that failed to parse, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejected {
    pub error: AnnotationError,
    pub span: SourceSpan,
    pub location: Location,
}

impl Rejected {
    pub fn relocate(mut self, byte_offset: usize, origin: Location) -> Self {
        self.span = self.span.offset_by(byte_offset);
        self.location = self.location.relative_to(origin);
        self
    }
}

/// Outcome of one annotation span.
pub type ScanResult = Result<AnnotationRecord, Rejected>;
