//! Serializers for classification results.
//!
//! - **Turtle** ([`turtle`]): one positive and one negative result resource
//!   per learning problem, in the lpbenchgen result vocabulary.

pub mod turtle;

use serde::{Deserialize, Serialize};

/// Predictions for the remaining individuals of one learning problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemPrediction {
    /// IRI of the learning problem.
    pub problem: String,
    /// `(entity IRI, predicted membership)` pairs, in output order.
    pub entries: Vec<(String, bool)>,
}

impl ProblemPrediction {
    /// Entities predicted to belong (`true`) or not belong (`false`).
    pub fn with_label(&self, label: bool) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, l)| *l == label)
            .map(|(e, _)| e.as_str())
    }
}
