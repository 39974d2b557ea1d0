//! `carcino-evaluate`: Cross-validates an estimator on every learning
//! problem.
//!
//! **Outputs:**
//! - `<out>`: JSON report with per-problem and mean scores
//!
//! **Usage:**
//! ```text
//! carcino-evaluate [--config <path>] [--ontology <path>] [--problems <path>]
//!                  [--folds <k>] [--estimator router|naive] [--out <path>] [-v]
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
use carcino_classify::{EvaluationReport, Scores};
use carcino_clients::{logging, pipeline, writer, EstimatorKind, Settings};
use clap::Parser;
use serde::Serialize;

/// Cross-validate learning-problem classifiers.
#[derive(Parser)]
#[command(
    name = "carcino-evaluate",
    about = "Cross-validate learning-problem classifiers"
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

    /// Number of stratified folds, overriding `evaluation.folds`.
    #[arg(long)]
    folds: Option<usize>,

    /// Estimator to score, overriding `evaluation.estimator`.
    #[arg(long, value_enum)]
    estimator: Option<EstimatorKind>,

    /// Output JSON file, overriding `output.evaluation`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Output<'a> {
    mean: Scores,
    #[serde(flatten)]
    report: &'a EvaluationReport,
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
    if let Some(folds) = args.folds {
        settings.evaluation.folds = folds;
    }
    if let Some(estimator) = args.estimator {
        settings.evaluation.estimator = estimator;
    }
    if let Some(out) = args.out {
        settings.output.evaluation = out;
    }
    settings.validate()?;

    let index = pipeline::open_index(&settings.data)?;
    let problems = pipeline::load_problems(&settings.data.problems)?;
    let report =
        pipeline::evaluate(&index, &problems, &settings.evaluation, &settings.router())?;
    let mean = report.mean();
    writer::write_json(
        &settings.output.evaluation,
        &Output {
            mean,
            report: &report,
        },
    )?;

    println!("Evaluation Report");
    println!("=================");
    for result in &report.results {
        println!(
            "{}  F1 {:.3}  macro-F1 {:.3}  ({} examples)",
            result.problem, result.scores.f1, result.scores.f1_macro, result.examples
        );
    }
    println!();
    println!(
        "Mean over {} problem(s): precision {:.3}, recall {:.3}, F1 {:.3}, macro-F1 {:.3}",
        report.len(),
        mean.precision,
        mean.recall,
        mean.f1,
        mean.f1_macro
    );
    println!("  Output: {}", settings.output.evaluation.display());
    Ok(())
}
