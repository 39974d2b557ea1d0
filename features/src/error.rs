//! Feature extraction errors.

use carcino_ontology::IndexError;

/// Failure while building an extractor or a feature matrix.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// The underlying graph index failed.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// A bond does not connect exactly two distinct atoms.
    #[error("bond {bond} has {atoms} distinct atoms, expected 2")]
    MalformedBond {
        /// Bond identifier.
        bond: String,
        /// Number of distinct incident atoms found.
        atoms: usize,
    },
    /// The property exists but cannot be expressed as a compound feature.
    #[error("data property {0} is not a compound-level boolean property")]
    UnsupportedProperty(String),
    /// The property is not declared in the ontology.
    #[error("data property {0} is not declared in the ontology")]
    UnknownProperty(String),
    /// Matrices with different row counts were combined.
    #[error("cannot combine feature matrices: {0}")]
    Shape(String),
}
