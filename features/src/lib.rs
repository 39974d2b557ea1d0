//! Feature extraction for the carcinogenesis classifier.
//!
//! Every extractor turns a batch of entity identifiers into a
//! [`FeatureMatrix`] whose rows follow the input order and whose columns are
//! fixed when the extractor is built, from the class hierarchy in the
//! [`GraphIndex`](carcino_ontology::GraphIndex). The input never changes
//! the schema.
//!
//! Compound-level extractors ([`AtomFeatures`], [`BondFeatures`],
//! [`StructureFeatures`], [`DataPropertyFeatures`], [`CompoundFeatures`])
//! aggregate over a compound's relations. Entity-level extractors
//! ([`AtomTypeFeatures`], [`BondTypeFeatures`], [`StructureTypeFeatures`])
//! one-hot encode a single atom, bond or structure.
//!
//! Unknown entities never fail a batch: their row stays at zero and a
//! [`RowIssue`] is recorded.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod compound;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod matrix;

pub use compound::{
    AtomFeatures, BondFeatures, CompoundFeatures, DataPropertyFeatures, PropertySelection,
    StructureFeatures, UNSUPPORTED_PROPERTIES,
};
pub use entity::{bond_atoms, AtomTypeFeatures, BondTypeFeatures, StructureTypeFeatures};
pub use error::FeatureError;
pub use hierarchy::{CountPolicy, HierarchyColumns};
pub use matrix::{FeatureMatrix, IssueKind, RowIssue};

/// Maps entity identifiers to fixed-width numeric rows.
pub trait FeatureExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Column names. Identical for every call.
    fn columns(&self) -> &[String];

    /// One row per id, in input order.
    ///
    /// # Errors
    ///
    /// Fails only if the graph index cannot be queried. Unknown entities
    /// and malformed bonds are reported as [`RowIssue`]s instead.
    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError>;
}
