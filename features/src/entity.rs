//! Entity-level one-hot extractors for atoms, bonds and structures.

use std::sync::Arc;

use carcino_ontology::GraphIndex;
use tracing::warn;

use crate::error::FeatureError;
use crate::hierarchy::{soft_type, HierarchyColumns};
use crate::matrix::{FeatureMatrix, IssueKind};
use crate::FeatureExtractor;

/// Column of [`StructureTypeFeatures`] set for structures typed by a direct
/// Structure subclass.
pub const NO_SUBSTRUCTURE: &str = "none";

/// The two atoms of `bond`, ordered by IRI string comparison.
///
/// # Errors
///
/// Returns [`FeatureError::MalformedBond`] unless the bond has exactly two
/// distinct incident atoms.
pub fn bond_atoms(index: &GraphIndex, bond: &str) -> Result<(String, String), FeatureError> {
    let atoms = index.related(bond, &index.vocabulary().in_bond);
    match <[String; 2]>::try_from(atoms) {
        Ok([first, second]) => Ok((first, second)),
        Err(atoms) => Err(FeatureError::MalformedBond {
            bond: bond.to_string(),
            atoms: atoms.len(),
        }),
    }
}

/// One-hot of an atom's class and subclass.
#[derive(Debug, Clone)]
pub struct AtomTypeFeatures {
    index: Arc<GraphIndex>,
    schema: HierarchyColumns,
}

impl AtomTypeFeatures {
    /// Builds the schema from the hierarchy under `Atom`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>) -> Result<Self, FeatureError> {
        let schema = HierarchyColumns::two_level(&index, "Atom")?;
        Ok(Self { index, schema })
    }
}

impl FeatureExtractor for AtomTypeFeatures {
    fn name(&self) -> &str {
        "atom_type"
    }

    fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
        let mut matrix = FeatureMatrix::zeros(self.schema.columns().to_vec(), ids.len());
        for (row, id) in ids.iter().enumerate() {
            match soft_type(&self.index, id)? {
                Some(label) => {
                    for col in self.schema.hits(label) {
                        matrix.set(row, col, 1.0);
                    }
                }
                None => matrix.report(row, id, IssueKind::UnknownEntity),
            }
        }
        Ok(matrix)
    }
}

/// One-hot of a bond's class, then the class and subclass of its first
/// atom, then of its second atom.
///
/// Atom columns are prefixed `atom1.` and `atom2.`. A bond without exactly
/// two distinct atoms gets a zero row and a [`IssueKind::MalformedBond`]
/// issue.
#[derive(Debug, Clone)]
pub struct BondTypeFeatures {
    index: Arc<GraphIndex>,
    bonds: HierarchyColumns,
    atoms: HierarchyColumns,
    columns: Vec<String>,
}

impl BondTypeFeatures {
    /// Builds the schema from the `Bond` and `Atom` hierarchies.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>) -> Result<Self, FeatureError> {
        let bonds = HierarchyColumns::flat(&index, "Bond")?;
        let atoms = HierarchyColumns::two_level(&index, "Atom")?;
        let columns = bonds
            .columns()
            .iter()
            .cloned()
            .chain(atoms.columns().iter().map(|c| format!("atom1.{c}")))
            .chain(atoms.columns().iter().map(|c| format!("atom2.{c}")))
            .collect();
        Ok(Self {
            index,
            bonds,
            atoms,
            columns,
        })
    }

    fn mark_atom(
        &self,
        matrix: &mut FeatureMatrix,
        row: usize,
        offset: usize,
        atom: &str,
    ) -> Result<(), FeatureError> {
        if let Some(label) = soft_type(&self.index, atom)? {
            for col in self.atoms.hits(label) {
                matrix.set(row, offset + col, 1.0);
            }
        }
        Ok(())
    }
}

impl FeatureExtractor for BondTypeFeatures {
    fn name(&self) -> &str {
        "bond_type"
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
        let mut matrix = FeatureMatrix::zeros(self.columns.clone(), ids.len());
        let first_offset = self.bonds.len();
        let second_offset = first_offset + self.atoms.len();

        for (row, id) in ids.iter().enumerate() {
            let Some(label) = soft_type(&self.index, id)? else {
                matrix.report(row, id, IssueKind::UnknownEntity);
                continue;
            };
            let (first, second) = match bond_atoms(&self.index, id) {
                Ok(pair) => pair,
                Err(FeatureError::MalformedBond { bond, atoms }) => {
                    warn!(%bond, atoms, "malformed bond, row left at zero");
                    matrix.clear_row(row);
                    matrix.report(row, id, IssueKind::MalformedBond { atoms });
                    continue;
                }
                Err(e) => return Err(e),
            };
            for col in self.bonds.hits(label) {
                matrix.set(row, col, 1.0);
            }
            self.mark_atom(&mut matrix, row, first_offset, &first)?;
            self.mark_atom(&mut matrix, row, second_offset, &second)?;
        }
        Ok(matrix)
    }
}

/// One-hot of a structure's class and subclass, with a trailing
/// [`NO_SUBSTRUCTURE`] column for structures typed by a direct Structure
/// subclass.
#[derive(Debug, Clone)]
pub struct StructureTypeFeatures {
    index: Arc<GraphIndex>,
    schema: HierarchyColumns,
    columns: Vec<String>,
}

impl StructureTypeFeatures {
    /// Builds the schema from the hierarchy under `Structure`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Index`] if the index cannot be queried.
    pub fn new(index: Arc<GraphIndex>) -> Result<Self, FeatureError> {
        let schema = HierarchyColumns::two_level(&index, "Structure")?;
        let mut columns = schema.columns().to_vec();
        columns.push(NO_SUBSTRUCTURE.to_string());
        Ok(Self {
            index,
            schema,
            columns,
        })
    }
}

impl FeatureExtractor for StructureTypeFeatures {
    fn name(&self) -> &str {
        "structure_type"
    }

    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn transform(&self, ids: &[String]) -> Result<FeatureMatrix, FeatureError> {
        let mut matrix = FeatureMatrix::zeros(self.columns.clone(), ids.len());
        let none_col = self.schema.len();
        for (row, id) in ids.iter().enumerate() {
            let Some(label) = soft_type(&self.index, id)? else {
                matrix.report(row, id, IssueKind::UnknownEntity);
                continue;
            };
            let hits = self.schema.hits(label);
            if !hits.is_empty() && !self.schema.is_subclass(label) {
                matrix.set(row, none_col, 1.0);
            }
            for col in hits {
                matrix.set(row, col, 1.0);
            }
        }
        Ok(matrix)
    }
}
