//! Shared test fixtures for the carcino workspace.
//!
//! Each constant holds a small Turtle 1.1 graph shaped like the
//! carcinogenesis ontology. Tests parse them with
//! `carcino_ontology::loader::parse_str`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod fixtures;

pub use fixtures::{LEARNING_PROBLEMS, MINI_CARCINOGENESIS};

/// Namespace of the carcinogenesis ontology.
pub const NS: &str = "http://dl-learner.org/carcinogenesis#";

/// Resolves a local name in the carcinogenesis namespace.
#[must_use]
pub fn iri(local: &str) -> String {
    format!("{NS}{local}")
}

/// Resolves every local name in `locals`.
#[must_use]
pub fn iris(locals: &[&str]) -> Vec<String> {
    locals.iter().map(|l| iri(l)).collect()
}
