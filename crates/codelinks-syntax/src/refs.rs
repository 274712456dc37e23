//! Id-reference markers: `@need-ids: SPEC_1, SPEC_2`.
//!
//! A marker references specification items without declaring an
//! implementation item. Everything after the marker up to the end of the
//! line is split on commas and whitespace.

use crate::span::{Location, SourceSpan};
use serde::Serialize;

pub const DEFAULT_MARKER: &str = "@need-ids:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdReference {
    pub marker: String,
    pub ids: Vec<String>,
    /// From the marker to the end of the referenced ids.
    pub span: SourceSpan,
    /// Position of the marker.
    pub location: Location,
}

impl IdReference {
    pub fn relocate(mut self, byte_offset: usize, origin: Location) -> Self {
        self.span = self.span.offset_by(byte_offset);
        self.location = self.location.relative_to(origin);
        self
    }
}

/// Collect every marker occurrence in `text`, in text order.
pub fn extract_id_refs<S: AsRef<str>>(text: &str, markers: &[S]) -> Vec<IdReference> {
    let mut refs = Vec::new();
    let mut line_start = 0;
    for (row, line) in text.split('\n').enumerate() {
        let mut hits: Vec<(usize, &str)> = markers
            .iter()
            .map(|marker| -> &str { marker.as_ref() })
            .filter(|marker| !marker.is_empty())
            .flat_map(|marker| line.match_indices(marker))
            .collect();
        hits.sort_by_key(|(col, marker)| (*col, std::cmp::Reverse(marker.len())));

        // The first marker on a line consumes the rest of it.
        if let Some(&(col, marker)) = hits.first() {
            let body_start = col + marker.len();
            let body = line[body_start..].trim_end_matches('\r');
            let ids: Vec<String> = body
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
            if !ids.is_empty() {
                let end = body_start + body.trim_end().len();
                refs.push(IdReference {
                    marker: marker.to_string(),
                    ids,
                    span: SourceSpan::new(line_start + col, line_start + end),
                    location: Location::new(row + 1, line[..col].chars().count() + 1),
                });
            }
        }
        line_start += line.len() + 1;
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_and_space_separated() {
        let refs = extract_id_refs("// @need-ids: SPEC_1, SPEC_2 SPEC_3", &[DEFAULT_MARKER]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].ids, vec!["SPEC_1", "SPEC_2", "SPEC_3"]);
        assert_eq!(refs[0].location, Location::new(1, 4));
        assert_eq!(refs[0].span, SourceSpan::new(3, 35));
    }

    #[test]
    fn one_reference_per_line() {
        let text = "a\n# @need-ids: A\nb\n# @need-ids: B, C\n";
        let refs = extract_id_refs(text, &[DEFAULT_MARKER]);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].location.line, 2);
        assert_eq!(refs[1].ids, vec!["B", "C"]);
        assert_eq!(refs[1].location.line, 4);
    }

    #[test]
    fn empty_marker_is_ignored() {
        assert!(extract_id_refs("@need-ids:   ", &[DEFAULT_MARKER]).is_empty());
    }

    #[test]
    fn custom_markers() {
        let refs = extract_id_refs("// @implements: REQ_9", &["@implements:", "@need-ids:"]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].marker, "@implements:");
        assert_eq!(refs[0].ids, vec!["REQ_9"]);
    }

    #[test]
    fn longer_marker_wins_at_same_position() {
        let refs = extract_id_refs("@refs-all: A", &["@refs", "@refs-all:"]);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].marker, "@refs-all:");
    }

    #[test]
    fn crlf_line_endings() {
        let refs = extract_id_refs("@need-ids: A\r\n@need-ids: B\r\n", &[DEFAULT_MARKER]);
        assert_eq!(refs[0].ids, vec!["A"]);
        assert_eq!(refs[1].ids, vec!["B"]);
    }
}
