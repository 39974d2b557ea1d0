//! `carcino-index`: Loads the ontology and computes every index artifact.
//!
//! With a cache directory, later runs of `carcino-predict` and
//! `carcino-evaluate` read the artifacts instead of recomputing them.
//!
//! **Usage:**
//! ```text
//! carcino-index [--config <path>] [--ontology <path>] [--cache-dir <path>] [-v]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use carcino_clients::{logging, pipeline, Settings};
use clap::Parser;

/// Build and cache the carcinogenesis graph index.
#[derive(Parser)]
#[command(
    name = "carcino-index",
    about = "Build and cache the carcinogenesis graph index"
)]
struct Args {
    /// Settings file (default: carcino.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ontology document, overriding `data.ontology`.
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Artifact cache directory, overriding `data.cache_dir`.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ontology) = args.ontology {
        settings.data.ontology = ontology;
    }
    if let Some(dir) = args.cache_dir {
        settings.data.cache_dir = Some(dir);
    }
    settings.validate()?;

    let index = pipeline::open_index(&settings.data)?;
    let summary = pipeline::warm(&index)?;

    println!("Carcinogenesis index");
    println!("  Ontology: {}", settings.data.ontology.display());
    println!("  Triples: {}", summary.triples);
    println!("  Individuals: {}", summary.individuals);
    for (base, (classes, subclasses)) in &summary.hierarchy {
        println!("  {base}: {classes} classes, {subclasses} subclasses");
    }
    println!("  Data properties: {}", summary.data_properties.join(", "));
    if let Some(dir) = &settings.data.cache_dir {
        println!("  Cache: {}", dir.display());
    }
    Ok(())
}
