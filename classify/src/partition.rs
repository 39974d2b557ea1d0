//! Splitting an entity batch by ontology type and joining per-partition
//! predictions back into request order.
//!
//! [`partition`] and [`rejoin`] are generic over the classification
//! function; [`TypePartitioner`] binds them to a
//! [`GraphIndex`](carcino_ontology::GraphIndex).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use carcino_ontology::{GraphIndex, IndexError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PartitionError;

/// The four entity classes that get a dedicated classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PartitionKey {
    /// Chemical compounds.
    Compound,
    /// Atoms.
    Atom,
    /// Bonds.
    Bond,
    /// Structures.
    Structure,
}

impl PartitionKey {
    /// Every key, in routing order.
    pub const ALL: [PartitionKey; 4] = [
        PartitionKey::Compound,
        PartitionKey::Atom,
        PartitionKey::Bond,
        PartitionKey::Structure,
    ];

    /// Label of the base class of this partition.
    #[must_use]
    pub fn base_class(self) -> &'static str {
        match self {
            PartitionKey::Compound => "Compound",
            PartitionKey::Atom => "Atom",
            PartitionKey::Bond => "Bond",
            PartitionKey::Structure => "Structure",
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_class())
    }
}

/// Entities of one type, with their labels in parallel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<L> {
    /// Entity ids, in request order.
    pub ids: Vec<String>,
    /// `labels[i]` belongs to `ids[i]`.
    pub labels: Vec<L>,
}

impl<L> Partition<L> {
    fn new() -> Self {
        Self {
            ids: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the partition holds no entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Non-empty partitions of one batch plus the ids that fit none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitions<L> {
    parts: BTreeMap<PartitionKey, Partition<L>>,
    dropped: Vec<String>,
}

impl<L> Partitions<L> {
    /// The partition for `key`, if any entity has that type.
    #[must_use]
    pub fn get(&self, key: PartitionKey) -> Option<&Partition<L>> {
        self.parts.get(&key)
    }

    /// Non-empty partitions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (PartitionKey, &Partition<L>)> {
        self.parts.iter().map(|(k, p)| (*k, p))
    }

    /// Ids whose type matched no key, in request order.
    #[must_use]
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Entities across all partitions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.parts.values().map(Partition::len).sum()
    }
}

/// Outcome for one requested entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction<P> {
    /// The entity's partition produced a label.
    Predicted(P),
    /// The entity fell into no partition.
    NoPrediction,
}

impl<P> Prediction<P> {
    /// The predicted label, if any.
    #[must_use]
    pub fn predicted(&self) -> Option<&P> {
        match self {
            Prediction::Predicted(p) => Some(p),
            Prediction::NoPrediction => None,
        }
    }
}

/// Splits `ids` (and parallel `labels`) by the key `classify` assigns.
///
/// Ids classified `None` are dropped. Within a partition, request order is
/// kept.
///
/// # Errors
///
/// Returns [`PartitionError::LengthMismatch`] if the slices differ in
/// length, or any error `classify` returns.
pub fn partition<L, F>(
    ids: &[String],
    labels: &[L],
    mut classify: F,
) -> Result<Partitions<L>, PartitionError>
where
    L: Clone,
    F: FnMut(&str) -> Result<Option<PartitionKey>, PartitionError>,
{
    if ids.len() != labels.len() {
        return Err(PartitionError::LengthMismatch {
            ids: ids.len(),
            labels: labels.len(),
        });
    }
    let mut parts = BTreeMap::new();
    let mut dropped = Vec::new();
    for (id, label) in ids.iter().zip(labels) {
        match classify(id)? {
            Some(key) => {
                let part = parts.entry(key).or_insert_with(Partition::new);
                part.ids.push(id.clone());
                part.labels.push(label.clone());
            }
            None => dropped.push(id.clone()),
        }
    }
    Ok(Partitions { parts, dropped })
}

/// Left-joins per-partition predictions onto `original_ids`.
///
/// Ids in no partition, or in a partition without a prediction vector,
/// yield [`Prediction::NoPrediction`]. `original_ids` must be free of
/// duplicates.
///
/// # Errors
///
/// Returns [`PartitionError::PredictionLengthMismatch`] if a prediction
/// vector's length differs from its partition's.
pub fn rejoin<L, P: Clone>(
    original_ids: &[String],
    partitions: &Partitions<L>,
    predictions: &BTreeMap<PartitionKey, Vec<P>>,
) -> Result<Vec<Prediction<P>>, PartitionError> {
    let mut by_id: HashMap<&str, &P> = HashMap::with_capacity(partitions.total());
    for (key, part) in partitions.iter() {
        let Some(predicted) = predictions.get(&key) else {
            continue;
        };
        if predicted.len() != part.len() {
            return Err(PartitionError::PredictionLengthMismatch {
                key,
                expected: part.len(),
                found: predicted.len(),
            });
        }
        by_id.extend(part.ids.iter().map(String::as_str).zip(predicted));
    }
    Ok(original_ids
        .iter()
        .map(|id| match by_id.get(id.as_str()) {
            Some(p) => Prediction::Predicted((*p).clone()),
            None => Prediction::NoPrediction,
        })
        .collect())
}

/// Assigns entities to partitions by their most specific type.
///
/// An entity belongs to key K when its type is K's base class, a direct
/// subclass of it, or a subclass of one of those.
#[derive(Debug, Clone)]
pub struct TypePartitioner {
    index: Arc<GraphIndex>,
    keys: HashMap<String, PartitionKey>,
}

impl TypePartitioner {
    /// Precomputes the label → key table from the class hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::Index`] if the hierarchy cannot be read.
    pub fn new(index: Arc<GraphIndex>) -> Result<Self, PartitionError> {
        let mut keys = HashMap::new();
        for key in PartitionKey::ALL {
            let base = key.base_class();
            let classes = index.classes_under(base)?;
            let subclasses = index.subclass_to_parent(base)?;
            let labels = std::iter::once(base)
                .chain(classes.iter().map(String::as_str))
                .chain(subclasses.subclasses().iter().map(String::as_str));
            for label in labels {
                keys.entry(label.to_string()).or_insert(key);
            }
        }
        debug!(labels = keys.len(), "partition table built");
        Ok(Self { index, keys })
    }

    /// The partition `entity` falls into, or `None` for unknown entities
    /// and types outside the four hierarchies.
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::Index`] if the type map cannot be loaded.
    pub fn key_of(&self, entity: &str) -> Result<Option<PartitionKey>, PartitionError> {
        match self.index.type_of(entity) {
            Ok(label) => Ok(self.keys.get(label).copied()),
            Err(IndexError::UnknownEntity(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Splits a labelled batch by type.
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::LengthMismatch`] if the slices differ in
    /// length, or [`PartitionError::Index`] if the type map cannot be
    /// loaded.
    pub fn partition<L: Clone>(
        &self,
        ids: &[String],
        labels: &[L],
    ) -> Result<Partitions<L>, PartitionError> {
        let parts = partition(ids, labels, |id| self.key_of(id))?;
        if !parts.dropped().is_empty() {
            debug!(dropped = parts.dropped().len(), "entities of unrecognized type");
        }
        Ok(parts)
    }

    /// Splits an unlabelled batch by type.
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::Index`] if the type map cannot be loaded.
    pub fn partition_ids(&self, ids: &[String]) -> Result<Partitions<()>, PartitionError> {
        self.partition(ids, &vec![(); ids.len()])
    }

    /// See [`rejoin`].
    ///
    /// # Errors
    ///
    /// Returns [`PartitionError::PredictionLengthMismatch`] on a prediction
    /// vector of the wrong length.
    pub fn rejoin<L, P: Clone>(
        &self,
        original_ids: &[String],
        partitions: &Partitions<L>,
        predictions: &BTreeMap<PartitionKey, Vec<P>>,
    ) -> Result<Vec<Prediction<P>>, PartitionError> {
        rejoin(original_ids, partitions, predictions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn by_prefix(id: &str) -> Result<Option<PartitionKey>, PartitionError> {
        Ok(match id.chars().next() {
            Some('a') => Some(PartitionKey::Atom),
            Some('b') => Some(PartitionKey::Bond),
            Some('d') => Some(PartitionKey::Compound),
            _ => None,
        })
    }

    #[test]
    fn rejoin_restores_request_order() {
        let ids = ids(&["a1", "b1", "a2"]);
        let parts = partition(&ids, &[(), (), ()], by_prefix).unwrap();
        let mut predictions = BTreeMap::new();
        predictions.insert(PartitionKey::Atom, vec![1, 0]);
        predictions.insert(PartitionKey::Bond, vec![1]);
        let joined = rejoin(&ids, &parts, &predictions).unwrap();
        assert_eq!(
            joined,
            vec![
                Prediction::Predicted(1),
                Prediction::Predicted(1),
                Prediction::Predicted(0)
            ]
        );
    }

    #[test]
    fn unrecognized_ids_are_dropped() {
        let ids = ids(&["x1", "d1"]);
        let parts = partition(&ids, &[true, false], by_prefix).unwrap();
        assert_eq!(parts.dropped(), ["x1"]);
        assert_eq!(parts.get(PartitionKey::Compound).unwrap().labels, vec![false]);
        assert!(parts.get(PartitionKey::Atom).is_none());

        let mut predictions = BTreeMap::new();
        predictions.insert(PartitionKey::Compound, vec![true]);
        let joined = rejoin(&ids, &parts, &predictions).unwrap();
        assert_eq!(joined[0], Prediction::NoPrediction);
        assert_eq!(joined[1], Prediction::Predicted(true));
    }

    #[test]
    fn length_mismatches_are_rejected() {
        let ids = ids(&["a1", "a2"]);
        assert!(matches!(
            partition(&ids, &[true], by_prefix),
            Err(PartitionError::LengthMismatch { ids: 2, labels: 1 })
        ));

        let parts = partition(&ids, &[true, false], by_prefix).unwrap();
        let mut predictions = BTreeMap::new();
        predictions.insert(PartitionKey::Atom, vec![true]);
        assert!(matches!(
            rejoin(&ids, &parts, &predictions),
            Err(PartitionError::PredictionLengthMismatch {
                key: PartitionKey::Atom,
                expected: 2,
                found: 1
            })
        ));
    }
}
