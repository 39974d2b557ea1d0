//! Glue between settings, the graph index and the classifiers.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use carcino_classify::{
    cross_validate, ClassifierRouter, ClassifyError, Estimator, EvaluationReport, PartitionKey,
    ProblemScore, RouterConfig, Scores, TypeMajorityEstimator,
};
use carcino_ontology::{
    loader, problems, ArtifactCache, GraphIndex, JsonDirCache, LearningProblem, MemoryCache,
    ProblemPrediction,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DataSettings, EstimatorKind, EvaluationSettings};

/// Loads the ontology and wraps it in an index backed by the configured
/// cache.
///
/// # Errors
///
/// Returns an error if the ontology cannot be loaded or the cache directory
/// cannot be created.
pub fn open_index(data: &DataSettings) -> Result<Arc<GraphIndex>> {
    let store = loader::load_path(&data.ontology)
        .with_context(|| format!("Failed to load ontology: {}", data.ontology.display()))?;
    let cache: Box<dyn ArtifactCache> = match &data.cache_dir {
        Some(dir) => Box::new(
            JsonDirCache::open(dir)
                .with_context(|| format!("Failed to open cache: {}", dir.display()))?,
        ),
        None => Box::new(MemoryCache::new()),
    };
    Ok(Arc::new(GraphIndex::new(
        store,
        data.vocabulary.clone(),
        cache,
    )))
}

/// Reads every learning problem in a Turtle file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded.
pub fn load_problems(path: &Path) -> Result<Vec<LearningProblem>> {
    let store = loader::load_path(path)
        .with_context(|| format!("Failed to load learning problems: {}", path.display()))?;
    let problems = problems::from_store(&store);
    info!(problems = problems.len(), "learning problems loaded");
    Ok(problems)
}

/// What [`warm`] computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    /// Triples in the graph.
    pub triples: usize,
    /// Individuals in the graph.
    pub individuals: usize,
    /// Per base class: direct subclasses and their subclasses.
    pub hierarchy: BTreeMap<String, (usize, usize)>,
    /// Declared data properties.
    pub data_properties: Vec<String>,
}

/// Computes every artifact the classifiers need, so that later runs can
/// read them from the cache.
///
/// # Errors
///
/// Returns an error if an artifact cannot be computed or cached.
pub fn warm(index: &GraphIndex) -> Result<IndexSummary> {
    let individuals = index.individuals()?.len();
    index.type_map()?;

    let mut hierarchy = BTreeMap::new();
    for key in PartitionKey::ALL {
        let base = key.base_class();
        let classes = index.classes_under(base)?;
        let subclasses = index.subclass_to_parent(base)?;
        index.individuals_of_type(base)?;
        hierarchy.insert(base.to_string(), (classes.len(), subclasses.len()));
    }

    let data_properties = index.data_properties()?.to_vec();
    for property in &data_properties {
        index.data_property_values(property)?;
    }

    Ok(IndexSummary {
        triples: index.store().len(),
        individuals,
        hierarchy,
        data_properties,
    })
}

/// Fits a router per problem on its examples and predicts every other
/// individual of the graph.
///
/// Individuals outside the four partitions are left out of the result.
///
/// # Errors
///
/// Returns an error if a router cannot be built, fitted or queried.
pub fn predict_remaining(
    index: &Arc<GraphIndex>,
    problems: &[LearningProblem],
    config: &RouterConfig,
) -> Result<Vec<ProblemPrediction>> {
    let individuals = index.individuals()?;
    let mut out = Vec::with_capacity(problems.len());

    for problem in problems {
        let mut router = ClassifierRouter::new(Arc::clone(index), config)?;
        router
            .fit(&problem.examples, &problem.labels)
            .with_context(|| format!("Failed to fit {}", problem.iri))?;

        let examples: BTreeSet<&str> = problem.examples.iter().map(String::as_str).collect();
        let remaining: Vec<String> = individuals
            .iter()
            .filter(|id| !examples.contains(id.as_str()))
            .cloned()
            .collect();
        let predicted = router
            .predict(&remaining)
            .with_context(|| format!("Failed to predict {}", problem.iri))?;

        let entries: Vec<(String, bool)> = remaining
            .into_iter()
            .zip(predicted)
            .filter_map(|(id, p)| p.predicted().map(|&label| (id, label)))
            .collect();
        debug!(
            problem = %problem.iri,
            predicted = entries.len(),
            positives = entries.iter().filter(|(_, l)| *l).count(),
            "problem predicted"
        );
        out.push(ProblemPrediction {
            problem: problem.iri.clone(),
            entries,
        });
    }
    Ok(out)
}

/// Cross-validates the configured estimator on every problem.
///
/// Problems with fewer examples than folds are skipped with a warning.
///
/// # Errors
///
/// Returns an error if an estimator fails on some fold.
pub fn evaluate(
    index: &Arc<GraphIndex>,
    problems: &[LearningProblem],
    evaluation: &EvaluationSettings,
    config: &RouterConfig,
) -> Result<EvaluationReport> {
    let mut report = EvaluationReport::new();
    for problem in problems {
        if problem.examples.len() < evaluation.folds {
            warn!(
                problem = %problem.iri,
                examples = problem.examples.len(),
                folds = evaluation.folds,
                "too few examples, skipped"
            );
            continue;
        }
        let (estimator, scores) = match evaluation.estimator {
            EstimatorKind::Router => score(problem, evaluation.folds, || {
                ClassifierRouter::new(Arc::clone(index), config)
            }),
            EstimatorKind::Naive => score(problem, evaluation.folds, || {
                Ok(TypeMajorityEstimator::new(Arc::clone(index)))
            }),
        }
        .with_context(|| format!("Failed to evaluate {}", problem.iri))?;
        report.push(ProblemScore {
            problem: problem.iri.clone(),
            estimator: estimator.to_string(),
            examples: problem.examples.len(),
            scores,
        });
    }
    Ok(report)
}

fn score<E, F>(
    problem: &LearningProblem,
    folds: usize,
    mut make: F,
) -> Result<(&'static str, Scores), ClassifyError>
where
    E: Estimator,
    F: FnMut() -> Result<E, ClassifyError>,
{
    let name = make()?.name();
    let scores = cross_validate(make, &problem.examples, &problem.labels, folds)?;
    Ok((name, scores))
}
