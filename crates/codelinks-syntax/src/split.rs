//! Field splitter: inner annotation text → ordered raw fields.

use crate::escape::Unescaped;

/// ID, Title, Type, Links, Status.
pub const MAX_FIELDS: usize = 5;

/// Ordered, trimmed, still-escaped fields of one annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields<'a> {
    fields: Vec<&'a str>,
}

impl<'a> RawFields<'a> {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `index`, `None` when not given.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fields.iter().copied()
    }
}

/// Split `inner` on commas at bracket depth 0, trimming every field.
///
/// Escaped commas and commas inside `[...]` never split. Empty fields are
/// kept so that `a, , c` still has three positions.
pub fn split_fields(inner: &str) -> RawFields<'_> {
    RawFields {
        fields: split_top_level(inner).into_iter().map(str::trim).collect(),
    }
}

/// Split on unescaped commas at bracket depth 0, without trimming.
///
/// A `]` that would take depth below zero is ignored for depth purposes;
/// balance is checked by the stages that care about it.
pub(crate) fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, byte) in Unescaped::new(text) {
        match byte {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
