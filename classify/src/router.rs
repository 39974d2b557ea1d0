//! One classifier per entity class, selected by type at fit and predict
//! time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use carcino_features::{
    AtomTypeFeatures, BondTypeFeatures, CompoundFeatures, CountPolicy, FeatureExtractor,
    PropertySelection, StructureTypeFeatures,
};
use carcino_ontology::GraphIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::{
    ConstantClassifier, DecisionTreeClassifier, TrainableClassifier, TreeParams,
};
use crate::error::ClassifyError;
use crate::partition::{PartitionKey, Prediction, TypePartitioner};

/// Settings for the default routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Aggregation policy of the compound extractors.
    pub policy: CountPolicy,
    /// Data properties fed to the compound classifier.
    pub properties: PropertySelection,
    /// Decision-tree hyperparameters, shared by every route.
    pub tree: TreeParams,
}

/// Which classifier a route will use for prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    /// Never fitted.
    Uninitialized,
    /// Every training label was positive.
    ConstantPositive,
    /// Every training label was negative, or the partition was empty.
    ConstantNegative,
    /// The trainable classifier was fitted.
    Fitted,
}

enum Slot {
    Uninitialized,
    Constant(ConstantClassifier),
    Fitted,
}

impl Slot {
    fn state(&self) -> SlotState {
        match self {
            Slot::Uninitialized => SlotState::Uninitialized,
            Slot::Constant(c) if c.value() => SlotState::ConstantPositive,
            Slot::Constant(_) => SlotState::ConstantNegative,
            Slot::Fitted => SlotState::Fitted,
        }
    }
}

struct Route {
    extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn TrainableClassifier>,
    slot: Slot,
}

/// A route: the partition it serves, its extractor and its classifier.
pub type RouteSpec = (
    PartitionKey,
    Box<dyn FeatureExtractor>,
    Box<dyn TrainableClassifier>,
);

fn route(
    key: PartitionKey,
    extractor: impl FeatureExtractor + 'static,
    tree: TreeParams,
) -> RouteSpec {
    (
        key,
        Box::new(extractor),
        Box::new(DecisionTreeClassifier::new(tree)),
    )
}

/// Splits a batch by entity class and hands each partition to its own
/// extractor and classifier.
pub struct ClassifierRouter {
    partitioner: TypePartitioner,
    routes: BTreeMap<PartitionKey, Route>,
}

impl fmt::Debug for ClassifierRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, route) in &self.routes {
            map.entry(key, &(route.extractor.name(), route.slot.state()));
        }
        map.finish()
    }
}

impl ClassifierRouter {
    /// The default routes: compound features for compounds, one-hot type
    /// features for atoms, bonds and structures, a decision tree each.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Features`] if an extractor cannot be built,
    /// or [`ClassifyError::Partition`] if the hierarchy cannot be read.
    pub fn new(index: Arc<GraphIndex>, config: &RouterConfig) -> Result<Self, ClassifyError> {
        let routes = vec![
            route(
                PartitionKey::Compound,
                CompoundFeatures::new(Arc::clone(&index), config.policy, &config.properties)?,
                config.tree,
            ),
            route(
                PartitionKey::Atom,
                AtomTypeFeatures::new(Arc::clone(&index))?,
                config.tree,
            ),
            route(
                PartitionKey::Bond,
                BondTypeFeatures::new(Arc::clone(&index))?,
                config.tree,
            ),
            route(
                PartitionKey::Structure,
                StructureTypeFeatures::new(Arc::clone(&index))?,
                config.tree,
            ),
        ];
        Self::with_routes(index, routes)
    }

    /// A router with caller-chosen routes. Entities of a class without a
    /// route get [`Prediction::NoPrediction`].
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Partition`] if the hierarchy cannot be read.
    pub fn with_routes(
        index: Arc<GraphIndex>,
        routes: Vec<RouteSpec>,
    ) -> Result<Self, ClassifyError> {
        let partitioner = TypePartitioner::new(index)?;
        let routes = routes
            .into_iter()
            .map(|(key, extractor, classifier)| {
                (
                    key,
                    Route {
                        extractor,
                        classifier,
                        slot: Slot::Uninitialized,
                    },
                )
            })
            .collect();
        Ok(Self {
            partitioner,
            routes,
        })
    }

    /// State of the route for `key`, or `None` if there is no such route.
    #[must_use]
    pub fn slot_state(&self, key: PartitionKey) -> Option<SlotState> {
        self.routes.get(&key).map(|r| r.slot.state())
    }

    /// Fits every route on its partition of the batch.
    ///
    /// A partition with only positive labels installs a positive constant;
    /// one with only negative labels, or no entities at all, a negative
    /// constant. A partition whose extractor has no columns installs the
    /// majority label (ties positive). Otherwise the trainable classifier
    /// is fitted. Every slot is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Partition`] on mismatched lengths, or any
    /// extraction or training error.
    pub fn fit(&mut self, ids: &[String], labels: &[bool]) -> Result<(), ClassifyError> {
        let partitions = self.partitioner.partition(ids, labels)?;
        for (key, route) in &mut self.routes {
            let (part_ids, part_labels) = match partitions.get(*key) {
                Some(part) => (part.ids.as_slice(), part.labels.as_slice()),
                None => (&[][..], &[][..]),
            };
            let positives = part_labels.iter().filter(|&&l| l).count();
            let negatives = part_labels.len() - positives;

            route.slot = if negatives == 0 && positives > 0 {
                Slot::Constant(ConstantClassifier::positive())
            } else if positives == 0 {
                Slot::Constant(ConstantClassifier::negative())
            } else if route.extractor.columns().is_empty() {
                Slot::Constant(if positives >= negatives {
                    ConstantClassifier::positive()
                } else {
                    ConstantClassifier::negative()
                })
            } else {
                let features = route.extractor.transform(part_ids)?;
                route.classifier.fit(features.values(), part_labels)?;
                Slot::Fitted
            };
            info!(
                partition = %key,
                examples = part_labels.len(),
                positives,
                state = ?route.slot.state(),
                "route fitted"
            );
        }
        Ok(())
    }

    /// Predicts every id, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::NotFitted`] if a non-empty partition's route
    /// was never fitted, or any extraction or prediction error.
    pub fn predict(&self, ids: &[String]) -> Result<Vec<Prediction<bool>>, ClassifyError> {
        let partitions = self.partitioner.partition_ids(ids)?;
        let mut predictions = BTreeMap::new();
        for (key, part) in partitions.iter() {
            let Some(route) = self.routes.get(&key) else {
                debug!(partition = %key, entities = part.len(), "no route");
                continue;
            };
            let predicted = match &route.slot {
                Slot::Uninitialized => return Err(ClassifyError::NotFitted(key)),
                Slot::Constant(c) => c.predict_rows(part.len()),
                Slot::Fitted => {
                    let features = route.extractor.transform(&part.ids)?;
                    route.classifier.predict(features.values())?
                }
            };
            predictions.insert(key, predicted);
        }
        Ok(self.partitioner.rejoin(ids, &partitions, &predictions)?)
    }
}
