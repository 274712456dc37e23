//! Report model — format-agnostic result of one run.

use codelinks_syntax::{
    build_graph, CorpusError, Location, Origin, ReferenceGraph, Rejected, ScannedBuffer,
};
use serde::Serialize;
use tracing::debug;

/// Everything found across all scanned files.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub nodes: Vec<NodeEntry>,
    pub references: Vec<ReferenceEntry>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: Summary,
}

/// One implementation item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub links: Vec<String>,
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// One `@need-ids:` style reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub marker: String,
    pub ids: Vec<String>,
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// A rejected annotation or a corpus-level finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Short machine-readable name, e.g. `missing_title`.
    pub code: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files: usize,
    pub annotations: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub unresolved: usize,
}

impl Diagnostic {
    fn at(file: &str, location: Location, code: &str, message: String) -> Self {
        Diagnostic {
            file: file.to_string(),
            line: location.line,
            column: location.column,
            code: code.to_string(),
            message,
        }
    }

    fn rejected(file: &str, rejected: &Rejected) -> Self {
        Self::at(
            file,
            rejected.location,
            rejected.error.code(),
            rejected.error.to_string(),
        )
    }

    /// Corpus errors are placed where the offending item was found.
    fn corpus(graph: &ReferenceGraph, error: &CorpusError) -> Self {
        let origin = match error {
            CorpusError::DuplicateId { duplicate, .. } => Some(duplicate.clone()),
            CorpusError::UnresolvedLink { id, .. } => graph.node(id).map(|node| node.origin()),
            CorpusError::UnresolvedReference { origin, .. } => Some(origin.clone()),
        };
        let Origin { source, location } = origin.unwrap_or(Origin {
            source: String::new(),
            location: Location::default(),
        });
        Self::at(&source, location, error.code(), error.to_string())
    }
}

impl Report {
    /// Fold scanned files, in the given order, into a report. With `strict`,
    /// links and references must name an implementation item of this run.
    pub fn new(buffers: Vec<ScannedBuffer>, strict: bool) -> Self {
        let mut summary = Summary {
            files: buffers.len(),
            ..Summary::default()
        };
        let mut diagnostics = Vec::new();
        for buffer in &buffers {
            for result in &buffer.results {
                summary.annotations += 1;
                if let Err(rejected) = result {
                    debug!(file = %buffer.source, location = %rejected.location, "{}", rejected.error);
                    diagnostics.push(Diagnostic::rejected(&buffer.source, rejected));
                }
            }
        }
        summary.rejected = diagnostics.len();

        let (graph, mut corpus_errors) = build_graph(buffers);
        summary.accepted = summary.annotations - summary.rejected;
        summary.duplicates = corpus_errors.len();
        if strict {
            let unresolved = graph.check_links(&graph);
            summary.unresolved = unresolved.len();
            corpus_errors.extend(unresolved);
        }
        diagnostics.extend(corpus_errors.iter().map(|e| Diagnostic::corpus(&graph, e)));

        Report {
            nodes: graph.nodes().iter().map(NodeEntry::from).collect(),
            references: graph.references().iter().map(ReferenceEntry::from).collect(),
            diagnostics,
            summary,
        }
    }

    /// No rejected annotations, duplicates or (strict) unresolved links.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl From<&codelinks_syntax::Node> for NodeEntry {
    fn from(node: &codelinks_syntax::Node) -> Self {
        let record = &node.record;
        NodeEntry {
            id: record.id.clone(),
            title: record.title.clone(),
            kind: record.kind.clone(),
            status: record.status.clone(),
            links: record.links.iter().cloned().collect(),
            file: node.source.clone(),
            line: record.location.line,
            column: record.location.column,
        }
    }
}

impl From<&codelinks_syntax::LooseReference> for ReferenceEntry {
    fn from(loose: &codelinks_syntax::LooseReference) -> Self {
        ReferenceEntry {
            marker: loose.reference.marker.clone(),
            ids: loose.reference.ids.clone(),
            file: loose.source.clone(),
            line: loose.reference.location.line,
            column: loose.reference.location.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelinks_syntax::{scan_text_with, ScanOptions};

    fn buffer(source: &str, text: &str) -> ScannedBuffer {
        ScannedBuffer::new(source, scan_text_with(text, &ScanOptions::default()))
    }

    #[test]
    fn clean_report() {
        let report = Report::new(vec![buffer("a.c", "// [[IMPL_1, Foo, impl, [SPEC_1]]]")], false);
        assert!(report.is_clean());
        assert_eq!(report.summary.files, 1);
        assert_eq!(report.summary.accepted, 1);
        assert_eq!(report.nodes[0].links, vec!["SPEC_1"]);
        assert_eq!((report.nodes[0].line, report.nodes[0].column), (1, 4));
    }

    #[test]
    fn rejected_and_duplicate_diagnostics() {
        let report = Report::new(
            vec![
                buffer("a.c", "[[IMPL_1, Foo]]\n[[IMPL_2]]"),
                buffer("b.c", "[[IMPL_1, Again]]"),
            ],
            false,
        );
        assert!(!report.is_clean());
        let codes: Vec<&str> = report.diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["missing_title", "duplicate_id"]);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.diagnostics[1].file, "b.c");
        assert_eq!(report.summary.annotations, 3);
        assert_eq!(report.summary.rejected, 1);
        assert_eq!(report.summary.duplicates, 1);
    }

    #[test]
    fn strict_reports_dangling_links_at_their_node() {
        let text = "[[A, a, impl, [B, SPEC_1]]]\n[[B, b]]\n@need-ids: C";
        let lenient = Report::new(vec![buffer("a.c", text)], false);
        assert!(lenient.is_clean());

        let strict = Report::new(vec![buffer("a.c", text)], true);
        assert_eq!(strict.summary.unresolved, 2);
        assert_eq!(strict.diagnostics[0].code, "unresolved_link");
        assert_eq!((strict.diagnostics[0].line, strict.diagnostics[0].column), (1, 1));
        assert_eq!(strict.diagnostics[1].code, "unresolved_reference");
        assert_eq!(strict.diagnostics[1].line, 3);
    }
}
