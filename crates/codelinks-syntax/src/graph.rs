//! Reference graph: implementation items → the specification items they
//! claim to satisfy.
//!
//! [`GraphBuilder`] is an explicit accumulator. Fold buffers into it in a
//! fixed order and `DuplicateId` reporting is reproducible no matter how the
//! buffers were scanned. The first record for an id wins; later ones are
//! reported, never merged or overwritten.
//!
//! Link targets are not resolved while building. Consumers that want strict
//! resolution ask for it with a [`LinkResolver`].

use crate::error::{CorpusError, Origin};
use crate::model::{AnnotationRecord, ScanResult};
use crate::refs::IdReference;
use crate::scan::ScannedBuffer;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// One implementation item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub record: AnnotationRecord,
    pub source: String,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn links(&self) -> &BTreeSet<String> {
        &self.record.links
    }

    pub fn origin(&self) -> Origin {
        Origin {
            source: self.source.clone(),
            location: self.record.location,
        }
    }
}

/// An id reference together with the buffer it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LooseReference {
    pub reference: IdReference,
    pub source: String,
}

impl LooseReference {
    pub fn origin(&self) -> Origin {
        Origin {
            source: self.source.clone(),
            location: self.reference.location,
        }
    }
}

/// A directed edge from an implementation item to a linked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge<'g> {
    pub from: &'g str,
    pub to: &'g str,
}

/// Answers whether a link target exists somewhere.
pub trait LinkResolver {
    fn resolves(&self, target: &str) -> bool;
}

impl<F> LinkResolver for F
where
    F: Fn(&str) -> bool,
{
    fn resolves(&self, target: &str) -> bool {
        self(target)
    }
}

impl LinkResolver for HashSet<String> {
    fn resolves(&self, target: &str) -> bool {
        self.contains(target)
    }
}

impl LinkResolver for BTreeSet<String> {
    fn resolves(&self, target: &str) -> bool {
        self.contains(target)
    }
}

/// Resolves against the graph's own implementation items.
impl LinkResolver for ReferenceGraph {
    fn resolves(&self, target: &str) -> bool {
        self.contains(target)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceGraph {
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    references: Vec<LooseReference>,
}

impl ReferenceGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Nodes in first-seen order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn references(&self) -> &[LooseReference] {
        &self.references
    }

    /// Every node's links, in node order, targets sorted.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.links().iter().map(move |to| Edge {
                from: node.id(),
                to: to.as_str(),
            })
        })
    }

    /// Targets linked from `id`; `None` when `id` is not a node.
    pub fn links_from(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.node(id).map(Node::links)
    }

    /// Nodes that link to `target`, in node order.
    pub fn linked_by<'g>(&'g self, target: &'g str) -> impl Iterator<Item = &'g Node> + 'g {
        self.nodes
            .iter()
            .filter(move |node| node.links().contains(target))
    }

    /// Edges whose target `resolver` does not know.
    pub fn dangling<'g, R>(&'g self, resolver: &'g R) -> impl Iterator<Item = Edge<'g>> + 'g
    where
        R: LinkResolver + ?Sized,
    {
        self.edges().filter(move |edge| !resolver.resolves(edge.to))
    }

    /// Strict resolution: one error per unresolved link or reference id.
    pub fn check_links<R>(&self, resolver: &R) -> Vec<CorpusError>
    where
        R: LinkResolver + ?Sized,
    {
        let mut errors: Vec<CorpusError> = self
            .dangling(resolver)
            .map(|edge| CorpusError::UnresolvedLink {
                id: edge.from.to_string(),
                target: edge.to.to_string(),
            })
            .collect();
        for loose in &self.references {
            for target in &loose.reference.ids {
                if !resolver.resolves(target) {
                    errors.push(CorpusError::UnresolvedReference {
                        target: target.clone(),
                        origin: loose.origin(),
                    });
                }
            }
        }
        errors
    }
}

/// Folds records into a [`ReferenceGraph`], collecting corpus errors.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ReferenceGraph,
    errors: Vec<CorpusError>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. A duplicate id is reported and the record dropped.
    pub fn insert(&mut self, source: &str, record: AnnotationRecord) {
        if let Some(&existing) = self.graph.index.get(&record.id) {
            let first = self.graph.nodes[existing].origin();
            debug!(id = %record.id, %first, "duplicate id");
            self.errors.push(CorpusError::DuplicateId {
                duplicate: Origin {
                    source: source.to_string(),
                    location: record.location,
                },
                id: record.id,
                first,
            });
            return;
        }
        self.graph
            .index
            .insert(record.id.clone(), self.graph.nodes.len());
        self.graph.nodes.push(Node {
            record,
            source: source.to_string(),
        });
    }

    /// Add the accepted records of one buffer; rejected spans are skipped.
    pub fn extend<I>(&mut self, source: &str, results: I)
    where
        I: IntoIterator<Item = ScanResult>,
    {
        for record in results.into_iter().flatten() {
            self.insert(source, record);
        }
    }

    pub fn add_reference(&mut self, source: &str, reference: IdReference) {
        self.graph.references.push(LooseReference {
            reference,
            source: source.to_string(),
        });
    }

    pub fn add_buffer(&mut self, buffer: ScannedBuffer) {
        let ScannedBuffer {
            source,
            results,
            references,
        } = buffer;
        self.extend(&source, results);
        for reference in references {
            self.add_reference(&source, reference);
        }
    }

    pub fn finish(self) -> (ReferenceGraph, Vec<CorpusError>) {
        debug!(
            nodes = self.graph.len(),
            references = self.graph.references.len(),
            errors = self.errors.len(),
            "reference graph built"
        );
        (self.graph, self.errors)
    }
}

/// Fold scanned buffers, in the given order, into a graph.
pub fn build_graph<I>(buffers: I) -> (ReferenceGraph, Vec<CorpusError>)
where
    I: IntoIterator<Item = ScannedBuffer>,
{
    let mut builder = GraphBuilder::new();
    for buffer in buffers {
        builder.add_buffer(buffer);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{scan_corpus, scan_text, scan_text_with, ScanOptions};
    use crate::span::Location;

    fn buffer(source: &str, text: &str) -> ScannedBuffer {
        ScannedBuffer::new(source, scan_text_with(text, &ScanOptions::default()))
    }

    #[test]
    fn nodes_and_edges() {
        let (graph, errors) = build_graph([buffer(
            "a.c",
            "// [[IMPL_1, Foo, impl, [SPEC_2, SPEC_1]]]\n// [[IMPL_2, Bar]]",
        )]);
        assert!(errors.is_empty());
        assert_eq!(graph.len(), 2);
        let edges: Vec<(&str, &str)> = graph.edges().map(|e| (e.from, e.to)).collect();
        assert_eq!(edges, vec![("IMPL_1", "SPEC_1"), ("IMPL_1", "SPEC_2")]);
        assert!(graph.links_from("IMPL_2").unwrap().is_empty());
        assert!(graph.links_from("IMPL_3").is_none());
    }

    #[test]
    fn duplicate_keeps_first() {
        let (graph, errors) = build_graph([
            buffer("a.c", "// [[IMPL_1, First, impl, [SPEC_1]]]"),
            buffer("b.c", "\n// [[IMPL_1, Second]]"),
        ]);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.node("IMPL_1").unwrap().record.title, "First");
        assert_eq!(graph.node("IMPL_1").unwrap().source, "a.c");
        assert_eq!(
            errors,
            vec![CorpusError::DuplicateId {
                id: "IMPL_1".into(),
                first: Origin {
                    source: "a.c".into(),
                    location: Location::new(1, 4),
                },
                duplicate: Origin {
                    source: "b.c".into(),
                    location: Location::new(2, 4),
                },
            }]
        );
    }

    #[test]
    fn each_extra_duplicate_is_reported() {
        let (graph, errors) = build_graph([buffer("a.c", "[[X, 1]] [[X, 2]] [[X, 3]]")]);
        assert_eq!(graph.len(), 1);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejected_spans_do_not_become_nodes() {
        let (graph, errors) = build_graph([buffer("a.c", "[[IMPL_1]] [[IMPL_2, ok]]")]);
        assert_eq!(graph.len(), 1);
        assert!(graph.contains("IMPL_2"));
        assert!(errors.is_empty());
    }

    #[test]
    fn duplicate_detection_is_independent_of_parallel_scan() {
        let buffers: Vec<(String, String)> = (0..16)
            .map(|i| (format!("f{i}.c"), format!("[[DUP, title {i}]]")))
            .collect();
        let (graph, errors) = build_graph(scan_corpus(&buffers, &ScanOptions::default()));
        assert_eq!(graph.node("DUP").unwrap().source, "f0.c");
        assert_eq!(errors.len(), 15);
        match &errors[0] {
            CorpusError::DuplicateId { duplicate, .. } => assert_eq!(duplicate.source, "f1.c"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn linked_by_reverse_lookup() {
        let (graph, _) = build_graph([buffer(
            "a.c",
            "[[A, a, impl, [S1, S2]]] [[B, b, impl, [S2]]] [[C, c]]",
        )]);
        let ids: Vec<&str> = graph.linked_by("S2").map(Node::id).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn dangling_edges_with_closure_and_graph() {
        let (graph, _) = build_graph([buffer("a.c", "[[A, a, impl, [B, SPEC_9]]] [[B, b]]")]);
        let dangling: Vec<&str> = graph.dangling(&graph).map(|e| e.to).collect();
        assert_eq!(dangling, vec!["SPEC_9"]);
        let known = |target: &str| target.starts_with("SPEC_");
        let dangling: Vec<&str> = graph.dangling(&known).map(|e| e.to).collect();
        assert_eq!(dangling, vec!["B"]);
    }

    #[test]
    fn strict_check_covers_references() {
        let (graph, _) = build_graph([buffer(
            "a.c",
            "[[A, a, impl, [S1]]]\n// @need-ids: S1, S2",
        )]);
        let known: HashSet<String> = ["S1".to_string()].into_iter().collect();
        let errors = graph.check_links(&known);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            CorpusError::UnresolvedReference { target, origin }
                if target == "S2" && origin.location == Location::new(2, 4)
        ));
    }

    #[test]
    fn builder_accepts_plain_result_sequences() {
        let mut builder = GraphBuilder::new();
        builder.extend("mem", scan_text("[[A, a]]"));
        builder.extend("mem", scan_text("[[B, b]]"));
        let (graph, errors) = builder.finish();
        assert_eq!(graph.len(), 2);
        assert!(errors.is_empty());
    }
}
