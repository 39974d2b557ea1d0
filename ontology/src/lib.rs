//! The carcinogenesis knowledge graph as a queryable index.
//!
//! `carcino-ontology` loads the carcinogenesis ontology (RDF/XML, Turtle or
//! N-Triples) into an owned [`TripleStore`] and wraps it in a
//! [`GraphIndex`], which answers the structural queries feature extraction
//! needs and caches every derived table through an [`ArtifactCache`].
//!
//! # Entry Point
//!
//! ```
//! use carcino_ontology::{loader, GraphIndex};
//!
//! let ttl = r#"
//! @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
//! @prefix c: <http://dl-learner.org/carcinogenesis#> .
//! c:Carbon rdfs:subClassOf c:Atom .
//! c:a1 a c:Carbon .
//! "#;
//! let store = loader::parse_str(ttl, loader::RdfFormat::Turtle).unwrap();
//! let index = GraphIndex::in_memory(store);
//! assert_eq!(index.type_of("http://dl-learner.org/carcinogenesis#a1").unwrap(), "Carbon");
//! ```
//!
//! Learning problems are read with [`problems::from_store`] and predictions
//! are written back with [`serializer::turtle::to_turtle`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod cache;
pub mod error;
pub mod index;
pub mod iris;
pub mod loader;
pub mod model;
pub mod problems;
pub mod serializer;

pub use cache::{ArtifactCache, ArtifactKey, JsonDirCache, MemoryCache, NoCache};
pub use error::{CacheError, IndexError, LoadError};
pub use index::{GraphIndex, SubclassMap};
pub use iris::Vocabulary;
pub use model::{Literal, Node, Triple, TripleStore};
pub use problems::LearningProblem;
pub use serializer::ProblemPrediction;
