//! Trainable binary classifiers.

use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClassifyError;

/// A binary classifier over feature rows.
pub trait TrainableClassifier: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Trains on `features` (one row per label). Fitting again replaces the
    /// previous model.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Shape`] if row and label counts differ, or
    /// [`ClassifyError::Training`] if the learner rejects the data.
    fn fit(&mut self, features: &Array2<f64>, labels: &[bool]) -> Result<(), ClassifyError>;

    /// One prediction per row of `features`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Training`] if the classifier has not been
    /// trained.
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<bool>, ClassifyError>;
}

/// Predicts the same label for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantClassifier {
    value: bool,
}

impl ConstantClassifier {
    /// Always predicts `true`.
    #[must_use]
    pub fn positive() -> Self {
        Self { value: true }
    }

    /// Always predicts `false`.
    #[must_use]
    pub fn negative() -> Self {
        Self { value: false }
    }

    /// The constant label.
    #[must_use]
    pub fn value(self) -> bool {
        self.value
    }

    /// Predicts for `rows` rows without looking at features.
    #[must_use]
    pub fn predict_rows(self, rows: usize) -> Vec<bool> {
        vec![self.value; rows]
    }
}

impl TrainableClassifier for ConstantClassifier {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn fit(&mut self, _features: &Array2<f64>, _labels: &[bool]) -> Result<(), ClassifyError> {
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<bool>, ClassifyError> {
        Ok(self.predict_rows(features.nrows()))
    }
}

/// Impurity measure used to choose splits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitCriterion {
    /// Gini impurity.
    #[default]
    Gini,
    /// Information gain.
    Entropy,
}

/// Decision-tree hyperparameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Maximum depth; unlimited when absent.
    pub max_depth: Option<usize>,
    /// Split criterion.
    pub criterion: SplitCriterion,
}

/// CART decision tree backed by `linfa-trees`.
#[derive(Debug)]
pub struct DecisionTreeClassifier {
    params: TreeParams,
    model: Option<DecisionTree<f64, bool>>,
}

impl DecisionTreeClassifier {
    /// An untrained tree.
    #[must_use]
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            model: None,
        }
    }

    /// Returns true once [`fit`](TrainableClassifier::fit) has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}

impl TrainableClassifier for DecisionTreeClassifier {
    fn name(&self) -> &'static str {
        "decision_tree"
    }

    fn fit(&mut self, features: &Array2<f64>, labels: &[bool]) -> Result<(), ClassifyError> {
        use linfa::traits::Fit;

        if features.nrows() != labels.len() {
            return Err(ClassifyError::Shape {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        let quality = match self.params.criterion {
            SplitCriterion::Gini => SplitQuality::Gini,
            SplitCriterion::Entropy => SplitQuality::Entropy,
        };
        let dataset = Dataset::new(features.to_owned(), Array1::from(labels.to_vec()));
        let model = DecisionTree::<f64, bool>::params()
            .split_quality(quality)
            .max_depth(self.params.max_depth)
            .fit(&dataset)
            .map_err(|e| ClassifyError::Training {
                classifier: "decision_tree",
                message: e.to_string(),
            })?;
        debug!(
            rows = features.nrows(),
            columns = features.ncols(),
            "decision tree fitted"
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Vec<bool>, ClassifyError> {
        use linfa::traits::Predict;

        let model = self.model.as_ref().ok_or_else(|| ClassifyError::Training {
            classifier: "decision_tree",
            message: "predict called before fit".to_string(),
        })?;
        let predicted: Array1<bool> = model.predict(features);
        Ok(predicted.to_vec())
    }
}
