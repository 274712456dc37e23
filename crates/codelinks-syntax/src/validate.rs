//! Validator: candidate → record, or the first failing check's error.
//!
//! Checks run in a fixed order and only the first failure is reported:
//!
//! 1. at most five fields
//! 2. id present
//! 3. title present
//! 4. Links is a bracketed list
//! 5. Status singleton is bracket-balanced
//! 6. no field spans lines
//! 7. id matches the configured pattern, if any

use crate::error::AnnotationError;
use crate::lexer::AnnotationSpan;
use crate::model::{AnnotationRecord, Rejected};
use crate::normalize::Candidate;
use crate::split::MAX_FIELDS;
use regex::Regex;

pub fn validate(
    candidate: Candidate,
    id_pattern: Option<&Regex>,
) -> Result<AnnotationRecord, AnnotationError> {
    if candidate.field_count > MAX_FIELDS {
        return Err(AnnotationError::TooManyFields {
            count: candidate.field_count,
        });
    }
    let id = candidate.id.ok_or(AnnotationError::MissingId)?;
    let title = candidate.title.ok_or(AnnotationError::MissingTitle)?;
    let links = candidate.links?;
    let status = candidate.status?;
    if let Some(field) = candidate.newline_in {
        return Err(AnnotationError::NewlineInField { field });
    }
    if let Some(pattern) = id_pattern {
        if !pattern.is_match(&id) {
            return Err(AnnotationError::InvalidId { id });
        }
    }

    Ok(AnnotationRecord {
        id,
        title,
        kind: candidate.kind,
        links,
        status,
        span: Default::default(),
        location: Default::default(),
    })
}

/// Validate a candidate and attach the position of the span it came from.
pub fn validate_span(
    candidate: Candidate,
    span: &AnnotationSpan<'_>,
    id_pattern: Option<&Regex>,
) -> Result<AnnotationRecord, Rejected> {
    match validate(candidate, id_pattern) {
        Ok(record) => Ok(AnnotationRecord {
            span: span.span,
            location: span.location,
            ..record
        }),
        Err(error) => Err(Rejected {
            error,
            span: span.span,
            location: span.location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FieldName, LinksFault};
    use crate::normalize::normalize;
    use crate::split::split_fields;

    fn check(inner: &str) -> Result<AnnotationRecord, AnnotationError> {
        validate(normalize(&split_fields(inner)), None)
    }

    #[test]
    fn accepts_two_fields() {
        let record = check("IMPL_1, Function Foo").unwrap();
        assert_eq!(record.id, "IMPL_1");
        assert_eq!(record.title, "Function Foo");
        assert!(record.kind.is_none());
        assert!(record.links.is_empty());
        assert!(record.status.is_none());
    }

    #[test]
    fn too_many_fields() {
        assert_eq!(
            check("IMPL_1, t, impl, [SPEC_1], open, low, high"),
            Err(AnnotationError::TooManyFields { count: 7 })
        );
    }

    #[test]
    fn too_many_fields_checked_before_anything_else() {
        assert_eq!(
            check(", , x, y, z, w"),
            Err(AnnotationError::TooManyFields { count: 6 })
        );
    }

    #[test]
    fn missing_id() {
        assert_eq!(check(" , title"), Err(AnnotationError::MissingId));
        assert_eq!(check(""), Err(AnnotationError::MissingId));
    }

    #[test]
    fn missing_title() {
        assert_eq!(check("IMPL_1"), Err(AnnotationError::MissingTitle));
        assert_eq!(check("IMPL_1, "), Err(AnnotationError::MissingTitle));
    }

    #[test]
    fn missing_id_reported_before_missing_title() {
        assert_eq!(check(" , "), Err(AnnotationError::MissingId));
    }

    #[test]
    fn malformed_links() {
        assert_eq!(
            check("IMPL_1, t, impl, SPEC_1"),
            Err(AnnotationError::MalformedLinks {
                fault: LinksFault::MissingBrackets
            })
        );
    }

    #[test]
    fn malformed_links_reported_before_status() {
        assert_eq!(
            check("IMPL_1, t, impl, SPEC_1, [a]b]"),
            Err(AnnotationError::MalformedLinks {
                fault: LinksFault::MissingBrackets
            })
        );
    }

    #[test]
    fn malformed_status() {
        assert_eq!(
            check("IMPL_1, t, impl, [], [a]b]"),
            Err(AnnotationError::MalformedStatus)
        );
    }

    #[test]
    fn newline_in_field() {
        assert_eq!(
            check("IMPL_1, a title\nacross lines"),
            Err(AnnotationError::NewlineInField {
                field: FieldName::Title
            })
        );
    }

    #[test]
    fn id_pattern() {
        let pattern = Regex::new(r"^IMPL_\w+$").unwrap();
        let candidate = normalize(&split_fields("FOO_1, t"));
        assert_eq!(
            validate(candidate, Some(&pattern)),
            Err(AnnotationError::InvalidId { id: "FOO_1".into() })
        );
        let candidate = normalize(&split_fields("IMPL_1, t"));
        assert!(validate(candidate, Some(&pattern)).is_ok());
    }

    #[test]
    fn comma_in_title_becomes_type() {
        let record = check("IMPL_7, Function has a, in the title").unwrap();
        assert_eq!(record.title, "Function has a");
        assert_eq!(record.kind.as_deref(), Some("in the title"));
    }
}
