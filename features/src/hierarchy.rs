//! Column schemas derived from the class hierarchy under a base class.

use std::collections::HashMap;

use carcino_ontology::{GraphIndex, IndexError};
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// How related entities are aggregated into a compound row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// Number of related entities per class.
    #[default]
    Counting,
    /// 1 if at least one related entity has the class, else 0.
    Binary,
}

impl CountPolicy {
    pub(crate) fn apply(self, current: f64) -> f64 {
        match self {
            CountPolicy::Counting => current + 1.0,
            CountPolicy::Binary => 1.0,
        }
    }
}

/// Column layout for one hierarchy: the direct subclasses of the base in
/// label order, then (for two-level schemas) their subclasses in
/// enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyColumns {
    base: String,
    columns: Vec<String>,
    position: HashMap<String, usize>,
    parent: HashMap<String, String>,
}

impl HierarchyColumns {
    /// Direct subclasses of `base` and their subclasses.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn two_level(index: &GraphIndex, base: &str) -> Result<Self, FeatureError> {
        let classes = index.classes_under(base)?;
        let subclasses = index.subclass_to_parent(base)?;
        let mut schema = Self::empty(base);
        for class in classes.iter() {
            schema.push(class);
        }
        for (sub, parent) in subclasses.iter() {
            schema.push(sub);
            schema.parent.insert(sub.to_string(), parent.to_string());
        }
        Ok(schema)
    }

    /// Direct subclasses of `base` only.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn flat(index: &GraphIndex, base: &str) -> Result<Self, FeatureError> {
        let classes = index.classes_under(base)?;
        let mut schema = Self::empty(base);
        for class in classes.iter() {
            schema.push(class);
        }
        Ok(schema)
    }

    fn empty(base: &str) -> Self {
        Self {
            base: base.to_string(),
            columns: Vec::new(),
            position: HashMap::new(),
            parent: HashMap::new(),
        }
    }

    fn push(&mut self, label: &str) {
        if !self.position.contains_key(label) {
            self.position.insert(label.to_string(), self.columns.len());
            self.columns.push(label.to_string());
        }
    }

    /// The base class label.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Column labels.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the base has no subclasses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column position of `label`.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.position.get(label).copied()
    }

    /// Returns true if `label` is a second-level class in this schema.
    #[must_use]
    pub fn is_subclass(&self, label: &str) -> bool {
        self.parent.contains_key(label)
    }

    /// Columns an entity typed `label` marks: its parent's and its own for
    /// a second-level class, its own for a first-level class, none for
    /// classes outside the schema.
    #[must_use]
    pub fn hits(&self, label: &str) -> Vec<usize> {
        let parent = self.parent.get(label).and_then(|p| self.position(p));
        parent.into_iter().chain(self.position(label)).collect()
    }
}

/// Most specific type of `entity`, or `None` for entities the graph does
/// not know.
pub(crate) fn soft_type<'a>(
    index: &'a GraphIndex,
    entity: &str,
) -> Result<Option<&'a str>, FeatureError> {
    match index.type_of(entity) {
        Ok(label) => Ok(Some(label)),
        Err(IndexError::UnknownEntity(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
