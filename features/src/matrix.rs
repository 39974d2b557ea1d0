//! The feature matrix type shared by every extractor.

use std::collections::HashSet;

use ndarray::{concatenate, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Why a row was left at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// The entity was never observed as an individual.
    UnknownEntity,
    /// The bond does not connect exactly two distinct atoms.
    MalformedBond {
        /// Number of distinct incident atoms.
        atoms: usize,
    },
}

/// A per-row problem recorded instead of failing the batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowIssue {
    /// Row index in the matrix.
    pub row: usize,
    /// Entity identifier of that row.
    pub entity: String,
    /// What went wrong.
    pub kind: IssueKind,
}

/// Rows are entities in request order, columns are named features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Array2<f64>,
    issues: Vec<RowIssue>,
}

impl FeatureMatrix {
    /// An all-zero matrix with `rows` rows and the given columns.
    #[must_use]
    pub fn zeros(columns: Vec<String>, rows: usize) -> Self {
        let width = columns.len();
        Self {
            columns,
            values: Array2::zeros((rows, width)),
            issues: Vec::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    /// Column names, in column order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The numeric cells.
    #[must_use]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consumes the matrix, returning the numeric cells.
    #[must_use]
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// One row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    /// The cell at `row` in the column named `column`.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.values.get((row, col)).copied()
    }

    /// Rows that were zeroed, with the reason.
    #[must_use]
    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    /// Places matrices side by side. Row issues are merged without
    /// duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Shape`] if `parts` is empty or the row counts
    /// differ.
    pub fn hstack(parts: Vec<FeatureMatrix>) -> Result<Self, FeatureError> {
        let rows = parts
            .first()
            .map(FeatureMatrix::n_rows)
            .ok_or_else(|| FeatureError::Shape("no matrices to stack".to_string()))?;
        if let Some(bad) = parts.iter().find(|p| p.n_rows() != rows) {
            return Err(FeatureError::Shape(format!(
                "expected {rows} rows, found {}",
                bad.n_rows()
            )));
        }

        let views: Vec<_> = parts.iter().map(|p| p.values.view()).collect();
        let values =
            concatenate(Axis(1), &views).map_err(|e| FeatureError::Shape(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        let mut columns = Vec::new();
        for part in parts {
            columns.extend(part.columns);
            for issue in part.issues {
                if seen.insert(issue.clone()) {
                    issues.push(issue);
                }
            }
        }
        issues.sort_by_key(|i| i.row);

        Ok(Self {
            columns,
            values,
            issues,
        })
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[(row, col)] = value;
    }

    pub(crate) fn add(&mut self, row: usize, col: usize, value: f64) {
        self.values[(row, col)] += value;
    }

    pub(crate) fn clear_row(&mut self, row: usize) {
        self.values.row_mut(row).mapv_inplace(|_| 0.0);
    }

    pub(crate) fn report(&mut self, row: usize, entity: &str, kind: IssueKind) {
        self.issues.push(RowIssue {
            row,
            entity: entity.to_string(),
            kind,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn zero_rows_keep_columns() {
        let m = FeatureMatrix::zeros(named(&["a", "b"]), 0);
        assert_eq!(m.n_rows(), 0);
        assert_eq!(m.n_columns(), 2);
    }

    #[test]
    fn hstack_concatenates_and_dedups_issues() {
        let mut left = FeatureMatrix::zeros(named(&["a"]), 2);
        left.set(1, 0, 3.0);
        left.report(0, "x", IssueKind::UnknownEntity);
        let mut right = FeatureMatrix::zeros(named(&["b", "c"]), 2);
        right.add(0, 1, 1.0);
        right.report(0, "x", IssueKind::UnknownEntity);

        let m = FeatureMatrix::hstack(vec![left, right]).unwrap();
        assert_eq!(m.columns(), ["a", "b", "c"]);
        assert_eq!(m.value(1, "a"), Some(3.0));
        assert_eq!(m.value(0, "c"), Some(1.0));
        assert_eq!(m.value(0, "missing"), None);
        assert_eq!(m.issues().len(), 1);
    }

    #[test]
    fn hstack_rejects_row_mismatch() {
        let err = FeatureMatrix::hstack(vec![
            FeatureMatrix::zeros(named(&["a"]), 2),
            FeatureMatrix::zeros(named(&["b"]), 3),
        ])
        .unwrap_err();
        assert!(matches!(err, FeatureError::Shape(_)));
        assert!(FeatureMatrix::hstack(Vec::new()).is_err());
    }
}
