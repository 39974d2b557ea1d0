//! Error types for loading, caching and indexing.

use std::path::PathBuf;

/// Failure to read or parse an RDF document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid in the selected syntax.
    #[error("failed to parse {origin} as {format}: {message}")]
    Parse {
        /// File path, or `<string>` for in-memory documents.
        origin: String,
        /// Syntax name.
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },
    /// The file extension does not map to a supported syntax.
    #[error("cannot infer RDF syntax from {0}")]
    UnknownFormat(PathBuf),
}

/// Failure to read or write a cached artifact.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure in a directory-backed cache.
    #[error("cache I/O on {path}: {source}")]
    Io {
        /// Artifact file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The stored bytes do not decode to the requested artifact.
    #[error("cache artifact {name} is corrupt: {source}")]
    Decode {
        /// Logical artifact name.
        name: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The artifact could not be encoded.
    #[error("cannot encode cache artifact {name}: {source}")]
    Encode {
        /// Logical artifact name.
        name: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a [`GraphIndex`](crate::GraphIndex) query.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The identifier was never observed as an individual in the graph.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    /// A cached artifact could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
