//! Field normalizer: raw fields → typed candidate.
//!
//! Normalization never fails. Structural faults in the Links and Status
//! fields are carried in the [`Candidate`] so the validator can report them
//! in its fixed check order.
//!
//! Splitting happens on escaped text, unescaping last: structural characters
//! are judged before unescape, literal characters appear after it.
//!
//! An unescaped comma in a title splits the annotation into one more field
//! (`[[IMPL_7, Function has a, in the title]]` gets type `in the title`).
//! That is a property of the grammar and is left to downstream checks.

use crate::error::{AnnotationError, FieldName, LinksFault};
use crate::escape::{bracket_balance, unescape, Balance, Unescaped};
use crate::split::{split_top_level, RawFields};
use std::collections::BTreeSet;

/// Positional fields mapped to their typed values, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Number of fields given, including any past the fifth.
    pub field_count: usize,
    pub id: Option<String>,
    pub title: Option<String>,
    pub kind: Option<String>,
    pub links: Result<BTreeSet<String>, AnnotationError>,
    pub status: Result<Option<String>, AnnotationError>,
    /// First given field containing a line break.
    pub newline_in: Option<FieldName>,
}

pub fn normalize(fields: &RawFields<'_>) -> Candidate {
    let newline_in = FieldName::ORDER
        .iter()
        .zip(fields.iter())
        .find(|(_, raw)| raw.contains('\n'))
        .map(|(name, _)| *name);

    Candidate {
        field_count: fields.len(),
        id: fields.get(0).and_then(scalar),
        title: fields.get(1).and_then(scalar),
        kind: fields.get(2).and_then(scalar),
        links: fields.get(3).map_or(Ok(BTreeSet::new()), normalize_links),
        status: fields.get(4).map_or(Ok(None), normalize_status),
        newline_in,
    }
}

/// Unescaped value, `None` when empty.
fn scalar(raw: &str) -> Option<String> {
    let value = unescape(raw);
    (!value.is_empty()).then_some(value)
}

/// True when the last character of `raw` is an unescaped `close`.
fn ends_with_unescaped(raw: &str, close: u8) -> bool {
    Unescaped::new(raw).last() == Some((raw.len() - 1, close))
}

/// `[A, B[x], C]` → {A, B[x], C}. An empty field means no links.
fn normalize_links(raw: &str) -> Result<BTreeSet<String>, AnnotationError> {
    let malformed = |fault| AnnotationError::MalformedLinks { fault };
    if raw.is_empty() {
        return Ok(BTreeSet::new());
    }

    let mut opens = false;
    let mut closes = false;
    for (_, byte) in Unescaped::new(raw) {
        opens |= byte == b'[';
        closes |= byte == b']';
    }
    if !opens || !closes {
        return Err(malformed(LinksFault::MissingBrackets));
    }
    if !raw.starts_with('[') || !ends_with_unescaped(raw, b']') {
        return Err(malformed(LinksFault::NotEnclosed));
    }

    let interior = &raw[1..raw.len() - 1];
    match bracket_balance(interior) {
        Balance::Balanced => {}
        // The opening `[` was closed before the end of the field.
        Balance::Underflow => return Err(malformed(LinksFault::NotEnclosed)),
        Balance::Unclosed => return Err(malformed(LinksFault::Unbalanced)),
    }

    Ok(split_top_level(interior)
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(unescape)
        .collect())
}

/// `[open]` → `open`; `[a, b]` and `open` are kept as given.
fn normalize_status(raw: &str) -> Result<Option<String>, AnnotationError> {
    if raw.starts_with('[') && ends_with_unescaped(raw, b']') {
        let interior = &raw[1..raw.len() - 1];
        if bracket_balance(interior) != Balance::Balanced {
            return Err(AnnotationError::MalformedStatus);
        }
        if split_top_level(interior).len() == 1 {
            return Ok(scalar(interior.trim()));
        }
    }
    Ok(scalar(raw))
}
