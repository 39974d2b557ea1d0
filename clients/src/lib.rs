//! Shared plumbing for the `carcino-*` binaries.
//!
//! - [`config`]: `carcino.toml` settings
//! - [`logging`]: `tracing` subscriber setup
//! - [`pipeline`]: index loading, prediction and cross-validation
//! - [`writer`]: result files

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod writer;

pub use config::{ConfigError, EstimatorKind, Settings};
