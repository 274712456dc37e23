//! codelinks-syntax — find and parse `[[ID, Title, Type, Links, Status]]`
//! implementation-link annotations in source text.
//!
//! Pipeline: lexer → splitter → normalizer → validator → reference graph.
//!
//! ```text
//! /// [[IMPL_6, Function Bar, impl, [SPEC_1, SPEC_2], [open]]]
//! ```
//!
//! Every stage is a pure function of its input. A malformed annotation is
//! reported as a [`Rejected`] result and never stops the scan; errors that
//! need the whole corpus (duplicate ids, unresolved links) come out of the
//! [`graph`] module.

pub mod error;
pub mod escape;
pub mod graph;
pub mod lexer;
pub mod model;
pub mod normalize;
pub mod refs;
pub mod scan;
pub mod span;
pub mod split;
pub mod validate;

pub use error::{AnnotationError, CorpusError, FieldName, LinksFault, OptionsError, Origin};
pub use graph::{build_graph, Edge, GraphBuilder, LinkResolver, LooseReference, Node, ReferenceGraph};
pub use lexer::{AnnotationSpan, Lexer};
pub use model::{AnnotationRecord, Rejected, ScanResult};
pub use normalize::{normalize, Candidate};
pub use refs::{extract_id_refs, IdReference, DEFAULT_MARKER};
pub use scan::{
    scan_corpus, scan_regions, scan_text, scan_text_with, ScanOptions, ScannedBuffer, ScannedText,
    TextRegion,
};
pub use span::{Location, SourceSpan};
pub use split::{split_fields, RawFields, MAX_FIELDS};
pub use validate::{validate, validate_span};
