//! Stratified cross-validation and the evaluation report.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClassifyError;
use crate::estimator::Estimator;
use crate::partition::Prediction;

/// Assigns every example to one of `k` folds, stratified by label: the i-th
/// positive example and the i-th negative example both go to fold `i % k`.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidFolds`] if `k < 2` or `k` exceeds the
/// number of examples.
pub fn stratified_folds(labels: &[bool], k: usize) -> Result<Vec<usize>, ClassifyError> {
    if k < 2 || k > labels.len() {
        return Err(ClassifyError::InvalidFolds {
            folds: k,
            examples: labels.len(),
        });
    }
    let (mut pos, mut neg) = (0usize, 0usize);
    Ok(labels
        .iter()
        .map(|&label| {
            let seen = if label { &mut pos } else { &mut neg };
            let fold = *seen % k;
            *seen += 1;
            fold
        })
        .collect())
}

/// Binary confusion counts. A missing prediction counts as negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confusion {
    /// True positives.
    pub tp: usize,
    /// False positives.
    pub fp: usize,
    /// False negatives.
    pub fn_: usize,
    /// True negatives.
    pub tn: usize,
}

impl Confusion {
    /// Tallies `predictions` against `truth`, pairwise.
    #[must_use]
    pub fn tally(truth: &[bool], predictions: &[Prediction<bool>]) -> Self {
        let mut c = Self::default();
        for (&actual, predicted) in truth.iter().zip(predictions) {
            let predicted = matches!(predicted, Prediction::Predicted(true));
            match (actual, predicted) {
                (true, true) => c.tp += 1,
                (false, true) => c.fp += 1,
                (true, false) => c.fn_ += 1,
                (false, false) => c.tn += 1,
            }
        }
        c
    }

    /// Positive-class precision; 0 when nothing was predicted positive.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// Positive-class recall; 0 when there are no positives.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// Positive-class F1.
    #[must_use]
    pub fn f1(&self) -> f64 {
        ratio(2 * self.tp, 2 * self.tp + self.fp + self.fn_)
    }

    /// Unweighted mean of the F1 of each class present in the truth or the
    /// predictions.
    #[must_use]
    pub fn f1_macro(&self) -> f64 {
        let positive_present = self.tp + self.fn_ + self.fp > 0;
        let negative_present = self.tn + self.fp + self.fn_ > 0;
        let negative_f1 = ratio(2 * self.tn, 2 * self.tn + self.fp + self.fn_);
        match (positive_present, negative_present) {
            (true, true) => (self.f1() + negative_f1) / 2.0,
            (true, false) => self.f1(),
            (false, true) => negative_f1,
            (false, false) => 0.0,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Mean scores over the evaluated folds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Positive-class precision.
    pub precision: f64,
    /// Positive-class recall.
    pub recall: f64,
    /// Positive-class F1.
    pub f1: f64,
    /// Macro-averaged F1.
    pub f1_macro: f64,
    /// Folds with a non-empty test split.
    pub folds: usize,
}

impl Scores {
    #[allow(clippy::cast_precision_loss)]
    fn mean(all: &[Scores]) -> Self {
        if all.is_empty() {
            return Self::default();
        }
        let n = all.len() as f64;
        let sum = |f: fn(&Scores) -> f64| all.iter().map(f).sum::<f64>() / n;
        Self {
            precision: sum(|s| s.precision),
            recall: sum(|s| s.recall),
            f1: sum(|s| s.f1),
            f1_macro: sum(|s| s.f1_macro),
            folds: all.iter().map(|s| s.folds).sum(),
        }
    }
}

/// Cross-validates a freshly built estimator per fold.
///
/// Folds whose test split is empty are skipped.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidFolds`] for an unusable `k`,
/// [`ClassifyError::Shape`] if `ids` and `labels` differ in length, or any
/// error from building, fitting or predicting.
pub fn cross_validate<E, F>(
    mut make_estimator: F,
    ids: &[String],
    labels: &[bool],
    k: usize,
) -> Result<Scores, ClassifyError>
where
    E: Estimator,
    F: FnMut() -> Result<E, ClassifyError>,
{
    if ids.len() != labels.len() {
        return Err(ClassifyError::Shape {
            rows: ids.len(),
            labels: labels.len(),
        });
    }
    let folds = stratified_folds(labels, k)?;
    let mut per_fold = Vec::with_capacity(k);

    for fold in 0..k {
        let (mut train_ids, mut train_labels) = (Vec::new(), Vec::new());
        let (mut test_ids, mut test_labels) = (Vec::new(), Vec::new());
        for ((id, &label), &f) in ids.iter().zip(labels).zip(&folds) {
            if f == fold {
                test_ids.push(id.clone());
                test_labels.push(label);
            } else {
                train_ids.push(id.clone());
                train_labels.push(label);
            }
        }
        if test_ids.is_empty() {
            debug!(fold, "empty test split, skipped");
            continue;
        }

        let mut estimator = make_estimator()?;
        estimator.fit(&train_ids, &train_labels)?;
        let predicted = estimator.predict(&test_ids)?;
        let confusion = Confusion::tally(&test_labels, &predicted);
        debug!(fold, ?confusion, "fold scored");
        per_fold.push(Scores {
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1(),
            f1_macro: confusion.f1_macro(),
            folds: 1,
        });
    }
    Ok(Scores::mean(&per_fold))
}

/// Cross-validation result for one learning problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemScore {
    /// Learning problem IRI.
    pub problem: String,
    /// Estimator name.
    pub estimator: String,
    /// Number of labelled examples.
    pub examples: usize,
    /// Mean fold scores.
    pub scores: Scores,
}

/// Aggregated evaluation over many learning problems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// One entry per evaluated problem.
    pub results: Vec<ProblemScore>,
}

impl EvaluationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a problem's result.
    pub fn push(&mut self, result: ProblemScore) {
        info!(
            problem = %result.problem,
            f1 = result.scores.f1,
            f1_macro = result.scores.f1_macro,
            "problem evaluated"
        );
        self.results.push(result);
    }

    /// Appends every result of `other`.
    pub fn extend(&mut self, other: EvaluationReport) {
        self.results.extend(other.results);
    }

    /// Number of evaluated problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no problem was evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Mean of the per-problem scores; `folds` is the total.
    #[must_use]
    pub fn mean(&self) -> Scores {
        let all: Vec<Scores> = self.results.iter().map(|r| r.scores).collect();
        Scores::mean(&all)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn folds_interleave_each_class() {
        let labels = [true, true, true, false, false, true, false];
        let folds = stratified_folds(&labels, 2).unwrap();
        assert_eq!(folds, vec![0, 1, 0, 0, 1, 1, 0]);
    }

    #[test]
    fn invalid_fold_counts() {
        assert!(matches!(
            stratified_folds(&[true, false], 1),
            Err(ClassifyError::InvalidFolds { folds: 1, examples: 2 })
        ));
        assert!(stratified_folds(&[true, false], 3).is_err());
    }

    #[test]
    fn zero_division_yields_zero() {
        let c = Confusion::tally(&[false, false], &[Prediction::NoPrediction, Prediction::Predicted(false)]);
        assert_eq!(c.tn, 2);
        assert_eq!(c.precision(), 0.0);
        assert_eq!(c.recall(), 0.0);
        assert_eq!(c.f1(), 0.0);
        assert_eq!(c.f1_macro(), 1.0);
    }

    #[test]
    fn metrics_match_hand_counts() {
        let truth = [true, true, false, false];
        let predicted = [
            Prediction::Predicted(true),
            Prediction::NoPrediction,
            Prediction::Predicted(true),
            Prediction::Predicted(false),
        ];
        let c = Confusion::tally(&truth, &predicted);
        assert_eq!((c.tp, c.fp, c.fn_, c.tn), (1, 1, 1, 1));
        assert!((c.precision() - 0.5).abs() < 1e-12);
        assert!((c.recall() - 0.5).abs() < 1e-12);
        assert!((c.f1() - 0.5).abs() < 1e-12);
        assert!((c.f1_macro() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn report_means_problem_scores() {
        let mut report = EvaluationReport::new();
        for (problem, f1) in [("lp_1", 1.0), ("lp_2", 0.5)] {
            report.push(ProblemScore {
                problem: problem.to_string(),
                estimator: "naive".to_string(),
                examples: 4,
                scores: Scores {
                    precision: f1,
                    recall: f1,
                    f1,
                    f1_macro: f1,
                    folds: 2,
                },
            });
        }
        let mean = report.mean();
        assert!((mean.f1 - 0.75).abs() < 1e-12);
        assert_eq!(mean.folds, 4);
    }
}
