//! Compound-level extractors: one row per compound, aggregated over the
//! atoms, bonds and structures it is linked to, plus its boolean data
//! properties.

use std::sync::Arc;

use carcino_ontology::GraphIndex;
use tracing::debug;

use crate::error::FeatureError;
use crate::hierarchy::{soft_type, CountPolicy, HierarchyColumns};
use crate::matrix::{FeatureMatrix, IssueKind};
use crate::FeatureExtractor;

/// Data properties that cannot be compound features.
///
/// `charge` is asserted on atoms, not compounds.
pub const UNSUPPORTED_PROPERTIES: [&str; 1] = ["charge"];

/// Counts (or flags) the classes of entities reached over one object
/// property.
#[derive(Debug, Clone)]
struct RelationCounts {
    name: &'static str,
    index: Arc<GraphIndex>,
    relation: String,
    schema: HierarchyColumns,
    policy: CountPolicy,
}

impl RelationCounts {
    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
        let mut matrix = FeatureMatrix::zeros(self.schema.columns().to_vec(), ids.len());
        for (row, id) in ids.iter().enumerate() {
            if soft_type(&self.index, id)?.is_none() {
                matrix.report(row, id, IssueKind::UnknownEntity);
                continue;
            }
            for related in self.index.related(id, &self.relation) {
                let Some(label) = soft_type(&self.index, &related)? else {
                    continue;
                };
                for col in self.schema.hits(label) {
                    let current = matrix.values()[(row, col)];
                    matrix.set(row, col, self.policy.apply(current));
                }
            }
        }
        debug!(
            extractor = self.name,
            rows = ids.len(),
            issues = matrix.issues().len(),
            "transformed"
        );
        Ok(matrix)
    }
}

macro_rules! relation_extractor {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(RelationCounts);

        impl FeatureExtractor for $name {
            fn name(&self) -> &str {
                $label
            }

            fn columns(&self) -> &[String] {
                self.0.schema.columns()
            }

            fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
                self.0.transform(ids)
            }
        }
    };
}

relation_extractor!(
    /// Atom classes and subclasses over `hasAtom`.
    ///
    /// An atom typed with a subclass increments the subclass column and its
    /// parent's column; an atom typed with a direct Atom subclass increments
    /// that column only.
    AtomFeatures,
    "atoms"
);

relation_extractor!(
    /// Direct Bond subclasses over `hasBond`.
    BondFeatures,
    "bonds"
);

relation_extractor!(
    /// Structure classes and subclasses over `hasStructure`.
    StructureFeatures,
    "structures"
);

impl AtomFeatures {
    /// Builds the schema from the hierarchy under `Atom`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>, policy: CountPolicy) -> Result<Self, FeatureError> {
        let schema = HierarchyColumns::two_level(&index, "Atom")?;
        let relation = index.vocabulary().has_atom.clone();
        Ok(Self(RelationCounts {
            name: "atoms",
            index,
            relation,
            schema,
            policy,
        }))
    }
}

impl BondFeatures {
    /// Builds the schema from the direct subclasses of `Bond`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>, policy: CountPolicy) -> Result<Self, FeatureError> {
        let schema = HierarchyColumns::flat(&index, "Bond")?;
        let relation = index.vocabulary().has_bond.clone();
        Ok(Self(RelationCounts {
            name: "bonds",
            index,
            relation,
            schema,
            policy,
        }))
    }
}

impl StructureFeatures {
    /// Builds the schema from the hierarchy under `Structure`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>, policy: CountPolicy) -> Result<Self, FeatureError> {
        let schema = HierarchyColumns::two_level(&index, "Structure")?;
        let relation = index.vocabulary().has_structure.clone();
        Ok(Self(RelationCounts {
            name: "structures",
            index,
            relation,
            schema,
            policy,
        }))
    }
}

/// Which boolean data properties become columns.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "properties")]
pub enum PropertySelection {
    /// Every declared data property except the listed ones and
    /// [`UNSUPPORTED_PROPERTIES`].
    AllExcept(Vec<String>),
    /// Exactly the listed properties, in the given order.
    Only(Vec<String>),
}

impl Default for PropertySelection {
    fn default() -> Self {
        PropertySelection::AllExcept(Vec::new())
    }
}

/// Tri-state data-property columns: `+1` asserted true, `-1` asserted
/// false, `0` absent.
#[derive(Debug, Clone)]
pub struct DataPropertyFeatures {
    index: Arc<GraphIndex>,
    columns: Vec<String>,
}

impl DataPropertyFeatures {
    /// Resolves `selection` against the declared data properties.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::UnsupportedProperty`] if an unsupported
    /// property is requested explicitly, [`FeatureError::UnknownProperty`]
    /// if a requested property is not declared, or [`FeatureError::Index`]
    /// if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>, selection: &PropertySelection) -> Result<Self, FeatureError> {
        let declared = index.data_properties()?;
        let columns = match selection {
            PropertySelection::AllExcept(excluded) => declared
                .iter()
                .filter(|p| !UNSUPPORTED_PROPERTIES.contains(&p.as_str()))
                .filter(|p| !excluded.contains(*p))
                .cloned()
                .collect(),
            PropertySelection::Only(wanted) => {
                for prop in wanted {
                    if UNSUPPORTED_PROPERTIES.contains(&prop.as_str()) {
                        return Err(FeatureError::UnsupportedProperty(prop.clone()));
                    }
                    if !declared.contains(prop) {
                        return Err(FeatureError::UnknownProperty(prop.clone()));
                    }
                }
                wanted.clone()
            }
        };
        Ok(Self { index, columns })
    }
}

impl FeatureExtractor for DataPropertyFeatures {
    fn name(&self) -> &str {
        "data_properties"
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
        let mut matrix = FeatureMatrix::zeros(self.columns.clone(), ids.len());
        let tables = self
            .columns
            .iter()
            .map(|p| self.index.data_property_values(p))
            .collect::<Result<Vec<_>, _>>()?;
        for (row, id) in ids.iter().enumerate() {
            if soft_type(&self.index, id)?.is_none() {
                matrix.report(row, id, IssueKind::UnknownEntity);
                continue;
            }
            for (col, table) in tables.iter().enumerate() {
                match table.get(id) {
                    Some(true) => matrix.set(row, col, 1.0),
                    Some(false) => matrix.set(row, col, -1.0),
                    None => {}
                }
            }
        }
        Ok(matrix)
    }
}

/// Horizontal concatenation of several extractors.
///
/// [`CompoundFeatures::new`] assembles the compound classifier's feature
/// set: atoms, bonds, structures, then data properties.
pub struct CompoundFeatures {
    parts: Vec<Box<dyn FeatureExtractor>>,
    columns: Vec<String>,
}

impl std::fmt::Debug for CompoundFeatures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.parts.iter().map(|p| p.name()).collect();
        f.debug_struct("CompoundFeatures")
            .field("parts", &names)
            .field("columns", &self.columns.len())
            .finish()
    }
}

impl CompoundFeatures {
    /// The default compound feature set.
    ///
    /// # Errors
    ///
    /// Propagates any error from the part constructors.
    pub fn new(
        index: Arc<GraphIndex>,
        policy: CountPolicy,
        selection: &PropertySelection,
    ) -> Result<Self, FeatureError> {
        Ok(Self::from_parts(vec![
            Box::new(AtomFeatures::new(Arc::clone(&index), policy)?),
            Box::new(BondFeatures::new(Arc::clone(&index), policy)?),
            Box::new(StructureFeatures::new(Arc::clone(&index), policy)?),
            Box::new(DataPropertyFeatures::new(index, selection)?),
        ]))
    }

    /// Concatenates arbitrary extractors, in order.
    #[must_use]
    pub fn from_parts(parts: Vec<Box<dyn FeatureExtractor>>) -> Self {
        let columns = parts
            .iter()
            .flat_map(|p| p.columns().iter().cloned())
            .collect();
        Self { parts, columns }
    }
}

impl FeatureExtractor for CompoundFeatures {
    fn name(&self) -> &str {
        "compound"
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
        if self.parts.is_empty() {
            return Ok(FeatureMatrix::zeros(Vec::new(), ids.len()));
        }
        let parts = self
            .parts
            .iter()
            .map(|p| p.transform(ids))
            .collect::<Result<Vec<_>, _>>()?;
        FeatureMatrix::hstack(parts)
    }
}
