//! The per-buffer pipeline and the parallel corpus scan.
//!
//! lexer → splitter → normalizer → validator, plus id-reference markers.
//! Every stage is pure, so buffers are scanned in parallel; results come
//! back in input order so that graph folding stays deterministic.

use crate::error::OptionsError;
use crate::lexer::Lexer;
use crate::model::ScanResult;
use crate::normalize::normalize;
use crate::refs::{extract_id_refs, IdReference, DEFAULT_MARKER};
use crate::span::Location;
use crate::split::split_fields;
use crate::validate::validate_span;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Scanner configuration. The default scans with no id pattern and the
/// `@need-ids:` reference marker.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    id_pattern: Option<Regex>,
    id_ref_markers: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            id_pattern: None,
            id_ref_markers: vec![DEFAULT_MARKER.to_string()],
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every id to match `pattern` in full.
    pub fn with_id_pattern(mut self, pattern: &str) -> Result<Self, OptionsError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| OptionsError::InvalidIdPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.id_pattern = Some(regex);
        Ok(self)
    }

    /// Replace the id-reference markers. An empty list disables them.
    pub fn with_id_ref_markers<I, S>(mut self, markers: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let markers: Vec<String> = markers.into_iter().map(Into::into).collect();
        if markers.iter().any(|m| m.trim().is_empty()) {
            return Err(OptionsError::EmptyMarker);
        }
        self.id_ref_markers = markers;
        Ok(self)
    }

    pub fn id_pattern(&self) -> Option<&Regex> {
        self.id_pattern.as_ref()
    }

    pub fn id_ref_markers(&self) -> &[String] {
        &self.id_ref_markers
    }
}

/// Everything found in one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScannedText {
    pub results: Vec<ScanResult>,
    pub references: Vec<IdReference>,
}

impl ScannedText {
    fn append(&mut self, other: ScannedText) {
        self.results.extend(other.results);
        self.references.extend(other.references);
    }
}

/// A scanned buffer tagged with the identifier of where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedBuffer {
    pub source: String,
    pub results: Vec<ScanResult>,
    pub references: Vec<IdReference>,
}

impl ScannedBuffer {
    pub fn new(source: impl Into<String>, scanned: ScannedText) -> Self {
        Self {
            source: source.into(),
            results: scanned.results,
            references: scanned.references,
        }
    }
}

/// A piece of a larger buffer, e.g. one comment of a source file, with where
/// it starts in that buffer.
#[derive(Debug, Clone, Copy)]
pub struct TextRegion<'a> {
    pub text: &'a str,
    pub byte_offset: usize,
    pub origin: Location,
}

impl<'a> TextRegion<'a> {
    pub fn whole(text: &'a str) -> Self {
        Self {
            text,
            byte_offset: 0,
            origin: Location::default(),
        }
    }
}

/// Scan `text` for annotations with default options.
pub fn scan_text(text: &str) -> Vec<ScanResult> {
    scan_annotations(text, &ScanOptions::default())
}

fn scan_annotations(text: &str, options: &ScanOptions) -> Vec<ScanResult> {
    Lexer::new(text)
        .map(|located| {
            let span = located?;
            let candidate = normalize(&split_fields(span.text));
            validate_span(candidate, &span, options.id_pattern())
        })
        .collect()
}

/// Scan `text` for annotations and id references.
pub fn scan_text_with(text: &str, options: &ScanOptions) -> ScannedText {
    let results = scan_annotations(text, options);
    let references = if options.id_ref_markers.is_empty() {
        Vec::new()
    } else {
        extract_id_refs(text, &options.id_ref_markers)
    };
    debug!(
        annotations = results.len(),
        rejected = results.iter().filter(|r| r.is_err()).count(),
        references = references.len(),
        "scanned {} bytes",
        text.len()
    );
    ScannedText {
        results,
        references,
    }
}

/// Scan the regions of one buffer, reporting positions in that buffer.
pub fn scan_regions(regions: &[TextRegion<'_>], options: &ScanOptions) -> ScannedText {
    let mut scanned = ScannedText::default();
    for region in regions {
        let ScannedText {
            results,
            references,
        } = scan_text_with(region.text, options);
        scanned.append(ScannedText {
            results: results
                .into_iter()
                .map(|result| {
                    result
                        .map(|r| r.relocate(region.byte_offset, region.origin))
                        .map_err(|r| r.relocate(region.byte_offset, region.origin))
                })
                .collect(),
            references: references
                .into_iter()
                .map(|r| r.relocate(region.byte_offset, region.origin))
                .collect(),
        });
    }
    scanned
}

/// Scan `(source, text)` buffers in parallel. Output order is input order.
pub fn scan_corpus<S, T>(buffers: &[(S, T)], options: &ScanOptions) -> Vec<ScannedBuffer>
where
    S: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    buffers
        .par_iter()
        .map(|(source, text)| {
            ScannedBuffer::new(source.as_ref(), scan_text_with(text.as_ref(), options))
        })
        .collect()
}
