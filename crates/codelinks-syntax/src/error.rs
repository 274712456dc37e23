//! Error taxonomy.
//!
//! [`AnnotationError`] is reported per annotation and never aborts a scan.
//! [`CorpusError`] needs the whole corpus and is produced by the graph
//! builder or by strict link resolution.

use crate::span::Location;
use serde::Serialize;
use std::fmt;

/// Why a Links field is not a bracketed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinksFault {
    /// No `[` / `]` at all.
    MissingBrackets,
    /// Brackets are present but do not wrap the whole field.
    NotEnclosed,
    /// The list interior has unbalanced brackets.
    Unbalanced,
}

impl fmt::Display for LinksFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            LinksFault::MissingBrackets => "must be given with '[]' brackets",
            LinksFault::NotEnclosed => "must start with '[' and end with ']'",
            LinksFault::Unbalanced => "has unbalanced brackets",
        };
        f.write_str(msg)
    }
}

/// Field names, as used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Id,
    Title,
    Type,
    Links,
    Status,
}

impl FieldName {
    pub const ORDER: [FieldName; 5] = [
        FieldName::Id,
        FieldName::Title,
        FieldName::Type,
        FieldName::Links,
        FieldName::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Id => "id",
            FieldName::Title => "title",
            FieldName::Type => "type",
            FieldName::Links => "links",
            FieldName::Status => "status",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single annotation failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationError {
    #[error("annotation opened with '[[' is never closed with ']]'")]
    UnterminatedAnnotation,

    #[error("{count} fields given; at most {max} are allowed", max = crate::split::MAX_FIELDS)]
    TooManyFields { count: usize },

    #[error("annotation has no id")]
    MissingId,

    #[error("annotation has no title")]
    MissingTitle,

    #[error("field links {fault}")]
    MalformedLinks { fault: LinksFault },

    #[error("field status has unbalanced brackets")]
    MalformedStatus,

    #[error("field {field} contains a newline")]
    NewlineInField { field: FieldName },

    #[error("id '{id}' does not match the configured id pattern")]
    InvalidId { id: String },
}

impl AnnotationError {
    /// Stable short name, the same as the serialized `kind` tag.
    pub fn code(&self) -> &'static str {
        match self {
            AnnotationError::UnterminatedAnnotation => "unterminated_annotation",
            AnnotationError::TooManyFields { .. } => "too_many_fields",
            AnnotationError::MissingId => "missing_id",
            AnnotationError::MissingTitle => "missing_title",
            AnnotationError::MalformedLinks { .. } => "malformed_links",
            AnnotationError::MalformedStatus => "malformed_status",
            AnnotationError::NewlineInField { .. } => "newline_in_field",
            AnnotationError::InvalidId { .. } => "invalid_id",
        }
    }
}

/// Where an implementation item was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Origin {
    pub source: String,
    pub location: Location,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.location)
    }
}

/// Corpus-level findings, available only after aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusError {
    #[error("duplicate id '{id}' at {duplicate}; first declared at {first}")]
    DuplicateId {
        id: String,
        first: Origin,
        duplicate: Origin,
    },

    #[error("'{id}' links to unknown item '{target}'")]
    UnresolvedLink { id: String, target: String },

    #[error("reference at {origin} names unknown item '{target}'")]
    UnresolvedReference { target: String, origin: Origin },
}

impl CorpusError {
    pub fn code(&self) -> &'static str {
        match self {
            CorpusError::DuplicateId { .. } => "duplicate_id",
            CorpusError::UnresolvedLink { .. } => "unresolved_link",
            CorpusError::UnresolvedReference { .. } => "unresolved_reference",
        }
    }
}

/// Invalid [`ScanOptions`](crate::ScanOptions).
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid id pattern '{pattern}': {source}")]
    InvalidIdPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("id reference marker must not be empty")]
    EmptyMarker,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            AnnotationError::TooManyFields { count: 7 }.to_string(),
            "7 fields given; at most 5 are allowed"
        );
        assert_eq!(
            AnnotationError::MalformedLinks {
                fault: LinksFault::NotEnclosed
            }
            .to_string(),
            "field links must start with '[' and end with ']'"
        );
    }

    #[test]
    fn code_matches_serialized_kind() {
        let err = AnnotationError::MalformedLinks {
            fault: LinksFault::Unbalanced,
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], err.code());
        assert_eq!(value["fault"], "unbalanced");
    }

    #[test]
    fn duplicate_message_names_both_origins() {
        let err = CorpusError::DuplicateId {
            id: "IMPL_1".into(),
            first: Origin {
                source: "a.c".into(),
                location: Location::new(1, 4),
            },
            duplicate: Origin {
                source: "b.c".into(),
                location: Location::new(7, 4),
            },
        };
        assert_eq!(
            err.to_string(),
            "duplicate id 'IMPL_1' at b.c:7:4; first declared at a.c:1:4"
        );
    }
}
