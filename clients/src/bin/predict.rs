//! `carcino-predict`: Fits a router per learning problem and predicts
//! membership of every other individual.
//!
//! **Outputs:**
//! - `<out>`: Turtle, one positive and one negative result resource per
//!   problem
//!
//! **Usage:**
//! ```text
//! carcino-predict [--config <path>] [--ontology <path>] [--problems <path>] [--out <path>] [-v]
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
use carcino_clients::{logging, pipeline, writer, Settings};
use carcino_ontology::serializer::turtle;
use clap::Parser;

/// Predict learning-problem membership for the carcinogenesis graph.
#[derive(Parser)]
#[command(
    name = "carcino-predict",
    about = "Predict learning-problem membership for the carcinogenesis graph"
)]
struct Args {
    /// Settings file (default: carcino.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ontology document, overriding `data.ontology`.
    #[arg(long)]
    ontology: Option<PathBuf>,

    /// Learning problems, overriding `data.problems`.
    #[arg(long)]
    problems: Option<PathBuf>,

    /// Output Turtle file, overriding `output.predictions`.
    #[arg(long)]
    out: Option<PathBuf>,

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
    if let Some(problems) = args.problems {
        settings.data.problems = problems;
    }
    if let Some(out) = args.out {
        settings.output.predictions = out;
    }
    settings.validate()?;

    let index = pipeline::open_index(&settings.data)?;
    let problems = pipeline::load_problems(&settings.data.problems)?;
    let predictions = pipeline::predict_remaining(&index, &problems, &settings.router())?;
    writer::write_text(&settings.output.predictions, &turtle::to_turtle(&predictions))?;

    println!("Predictions written.");
    println!("  Problems: {}", predictions.len());
    println!("  Output: {}", settings.output.predictions.display());
    Ok(())
}
