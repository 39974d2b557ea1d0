//! Partitioning and classification errors.

use carcino_features::FeatureError;
use carcino_ontology::IndexError;

use crate::partition::PartitionKey;

/// Failure while splitting a batch by type or joining predictions back.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// `ids` and `labels` have different lengths.
    #[error("{ids} ids but {labels} labels")]
    LengthMismatch {
        /// Number of ids.
        ids: usize,
        /// Number of labels.
        labels: usize,
    },
    /// A partition's prediction vector does not match its size.
    #[error("{key} partition has {expected} entities but {found} predictions")]
    PredictionLengthMismatch {
        /// The partition.
        key: PartitionKey,
        /// Entities in the partition.
        expected: usize,
        /// Predictions supplied.
        found: usize,
    },
    /// The type of an entity could not be looked up.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Failure while fitting, predicting or evaluating.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// A non-empty partition was predicted before its route was fitted.
    #[error("no classifier fitted for the {0} partition")]
    NotFitted(PartitionKey),
    /// The underlying classifier rejected the training data.
    #[error("{classifier} training failed: {message}")]
    Training {
        /// Classifier name.
        classifier: &'static str,
        /// Diagnostic from the learning library.
        message: String,
    },
    /// Feature and label counts disagree.
    #[error("{rows} feature rows but {labels} labels")]
    Shape {
        /// Feature rows.
        rows: usize,
        /// Labels.
        labels: usize,
    },
    /// Fold count outside `2..=examples`.
    #[error("cannot split {examples} examples into {folds} folds")]
    InvalidFolds {
        /// Requested folds.
        folds: usize,
        /// Available examples.
        examples: usize,
    },
    /// Feature extraction failed.
    #[error(transparent)]
    Features(#[from] FeatureError),
    /// Partitioning failed.
    #[error(transparent)]
    Partition(#[from] PartitionError),
}

impl From<IndexError> for ClassifyError {
    fn from(e: IndexError) -> Self {
        ClassifyError::Partition(PartitionError::Index(e))
    }
}
