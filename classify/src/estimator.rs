//! The fit/predict contract cross-validation drives, and a per-type
//! majority baseline.

use std::collections::HashMap;
use std::sync::Arc;

use carcino_ontology::{GraphIndex, IndexError};

use crate::error::{ClassifyError, PartitionError};
use crate::partition::Prediction;
use crate::router::ClassifierRouter;

/// Anything that learns labels for entity ids.
pub trait Estimator {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Trains on parallel `ids` and `labels`.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see the implementors.
    fn fit(&mut self, ids: &[String], labels: &[bool]) -> Result<(), ClassifyError>;

    /// One prediction per id, in request order.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see the implementors.
    fn predict(&self, ids: &[String]) -> Result<Vec<Prediction<bool>>, ClassifyError>;
}

impl Estimator for ClassifierRouter {
    fn name(&self) -> &'static str {
        "router"
    }

    fn fit(&mut self, ids: &[String], labels: &[bool]) -> Result<(), ClassifyError> {
        ClassifierRouter::fit(self, ids, labels)
    }

    fn predict(&self, ids: &[String]) -> Result<Vec<Prediction<bool>>, ClassifyError> {
        ClassifierRouter::predict(self, ids)
    }
}

/// Predicts the majority training label of an entity's most specific type.
///
/// Ties go to the positive label. Entities whose type was not seen in
/// training, and unknown entities, get [`Prediction::NoPrediction`].
#[derive(Debug, Clone)]
pub struct TypeMajorityEstimator {
    index: Arc<GraphIndex>,
    votes: HashMap<String, bool>,
}

impl TypeMajorityEstimator {
    /// An untrained estimator.
    #[must_use]
    pub fn new(index: Arc<GraphIndex>) -> Self {
        Self {
            index,
            votes: HashMap::new(),
        }
    }

    fn type_of(&self, id: &str) -> Result<Option<&str>, ClassifyError> {
        match self.index.type_of(id) {
            Ok(label) => Ok(Some(label)),
            Err(IndexError::UnknownEntity(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Estimator for TypeMajorityEstimator {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn fit(&mut self, ids: &[String], labels: &[bool]) -> Result<(), ClassifyError> {
        if ids.len() != labels.len() {
            return Err(PartitionError::LengthMismatch {
                ids: ids.len(),
                labels: labels.len(),
            }
            .into());
        }
        let mut tally: HashMap<String, (usize, usize)> = HashMap::new();
        for (id, &label) in ids.iter().zip(labels) {
            if let Some(ty) = self.type_of(id)? {
                let (pos, neg) = tally.entry(ty.to_string()).or_default();
                if label {
                    *pos += 1;
                } else {
                    *neg += 1;
                }
            }
        }
        self.votes = tally
            .into_iter()
            .map(|(ty, (pos, neg))| (ty, pos >= neg))
            .collect();
        Ok(())
    }

    fn predict(&self, ids: &[String]) -> Result<Vec<Prediction<bool>>, ClassifyError> {
        ids.iter()
            .map(|id| {
                let vote = self
                    .type_of(id)?
                    .and_then(|ty| self.votes.get(ty).copied());
                Ok(vote.map_or(Prediction::NoPrediction, Prediction::Predicted))
            })
            .collect()
    }
}
