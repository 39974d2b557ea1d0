//! Learning problems: labelled example sets over graph individuals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::iris::{
    local_name, LP_EXCLUDES_RESOURCE, LP_INCLUDES_RESOURCE, LP_LEARNING_PROBLEM, RDF_TYPE,
};
use crate::model::{Node, TripleStore};

/// One binary classification task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProblem {
    /// IRI of the problem resource.
    pub iri: String,
    /// Example individuals: included resources first, then excluded ones.
    pub examples: Vec<String>,
    /// `labels[i]` is true iff `examples[i]` is an included resource.
    pub labels: Vec<bool>,
}

impl LearningProblem {
    /// The problem number: the text after `lp_` in the local name, or the
    /// whole local name if there is no such prefix.
    #[must_use]
    pub fn number(&self) -> &str {
        let name = local_name(&self.iri);
        name.strip_prefix("lp_").unwrap_or(name)
    }

    /// Number of positive examples.
    #[must_use]
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }

    /// Number of negative examples.
    #[must_use]
    pub fn negatives(&self) -> usize {
        self.labels.len() - self.positives()
    }
}

/// Reads every learning problem declared in `store`, ordered by IRI.
///
/// A problem is any subject typed `lpclass:LearningProblem` or carrying
/// `lpprop:includesResource` / `lpprop:excludesResource`. Within a problem
/// the examples of each polarity are sorted.
#[must_use]
pub fn from_store(store: &TripleStore) -> Vec<LearningProblem> {
    let mut iris: BTreeSet<&str> = store.subjects(RDF_TYPE, LP_LEARNING_PROBLEM).collect();
    for predicate in [LP_INCLUDES_RESOURCE, LP_EXCLUDES_RESOURCE] {
        iris.extend(store.with_predicate(predicate).filter_map(|t| t.subject.as_iri()));
    }

    iris.into_iter()
        .map(|iri| {
            let resources = |predicate: &str| -> BTreeSet<String> {
                store
                    .objects(iri, predicate)
                    .filter_map(Node::as_iri)
                    .map(str::to_string)
                    .collect()
            };
            let included = resources(LP_INCLUDES_RESOURCE);
            let excluded = resources(LP_EXCLUDES_RESOURCE);
            let labels = std::iter::repeat(true)
                .take(included.len())
                .chain(std::iter::repeat(false).take(excluded.len()))
                .collect();
            LearningProblem {
                iri: iri.to_string(),
                examples: included.into_iter().chain(excluded).collect(),
                labels,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Triple;

    #[test]
    fn included_examples_come_first() {
        let lp = "https://lpbenchgen.org/resource/lp_7";
        let store: TripleStore = [
            Triple::iris(lp, LP_EXCLUDES_RESOURCE, "urn:x:a"),
            Triple::iris(lp, LP_INCLUDES_RESOURCE, "urn:x:c"),
            Triple::iris(lp, LP_INCLUDES_RESOURCE, "urn:x:b"),
        ]
        .into_iter()
        .collect();

        let problems = from_store(&store);
        assert_eq!(problems.len(), 1);
        let p = &problems[0];
        assert_eq!(p.number(), "7");
        assert_eq!(p.examples, vec!["urn:x:b", "urn:x:c", "urn:x:a"]);
        assert_eq!(p.labels, vec![true, true, false]);
        assert_eq!((p.positives(), p.negatives()), (2, 1));
    }

    #[test]
    fn typed_problem_without_examples_is_listed() {
        let store: TripleStore = [Triple::iris(
            "https://lpbenchgen.org/resource/empty",
            RDF_TYPE,
            LP_LEARNING_PROBLEM,
        )]
        .into_iter()
        .collect();
        let problems = from_store(&store);
        assert_eq!(problems[0].number(), "empty");
        assert!(problems[0].examples.is_empty());
    }
}
