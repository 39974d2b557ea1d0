//! Type-partitioned classification of carcinogenesis learning problems.
//!
//! A batch of entity ids is split by ontology type into
//! [`PartitionKey`]s; each partition is encoded by its own
//! [`FeatureExtractor`](carcino_features::FeatureExtractor) and classified
//! by its own [`TrainableClassifier`]. The [`ClassifierRouter`] drives the
//! whole round trip and returns one [`Prediction`] per requested id, in
//! request order.
//!
//! [`evaluation`] cross-validates any [`Estimator`] with a deterministic
//! stratified split.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod classifier;
pub mod error;
pub mod estimator;
pub mod evaluation;
pub mod partition;
pub mod router;

pub use classifier::{
    ConstantClassifier, DecisionTreeClassifier, SplitCriterion, TrainableClassifier, TreeParams,
};
pub use error::{ClassifyError, PartitionError};
pub use estimator::{Estimator, TypeMajorityEstimator};
pub use evaluation::{
    cross_validate, stratified_folds, Confusion, EvaluationReport, ProblemScore, Scores,
};
pub use partition::{
    partition, rejoin, Partition, PartitionKey, Partitions, Prediction, TypePartitioner,
};
pub use router::{ClassifierRouter, RouteSpec, RouterConfig, SlotState};
