use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hla3d_core::utils::get_dynamic_reader;

use crate::error::{EpitopeError, Result};
use crate::models::{AlleleField, ElliProScore, Epitope, PolymorphicResidue};

///
/// Immutable view over the epitope reference table.
///
/// Filters never touch the loaded rows: each one returns a new view sharing
/// the same records, so a repository loaded once can serve any number of requests.
///
#[derive(Debug, Clone, Default)]
pub struct EpitopeRepository {
    epitopes: Vec<Arc<Epitope>>,
}

impl EpitopeRepository {
    ///
    /// Build a repository from epitope records. Identifiers must be unique.
    ///
    pub fn new(epitopes: Vec<Epitope>) -> Result<Self> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for epitope in &epitopes {
            if !seen.insert(epitope.id.as_str()) {
                return Err(EpitopeError::InvalidInput(format!(
                    "duplicate epitope identifier in reference table: {}",
                    epitope.id
                )));
            }
        }

        Ok(EpitopeRepository {
            epitopes: epitopes.into_iter().map(Arc::new).collect(),
        })
    }

    ///
    /// Load the epitope table from a JSON file (plain or gzip-compressed).
    ///
    /// # Arguments
    /// - path: path to a JSON array of epitope records
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;
        let epitopes: Vec<Epitope> = serde_json::from_reader(reader)?;
        log::info!(
            "Loaded {} epitopes from {}",
            epitopes.len(),
            path.as_ref().display()
        );
        EpitopeRepository::new(epitopes)
    }

    pub fn len(&self) -> usize {
        self.epitopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epitopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Epitope> {
        self.epitopes.iter().map(|e| e.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&Epitope> {
        self.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> BTreeSet<String> {
        self.iter().map(|e| e.id.clone()).collect()
    }

    fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Epitope) -> bool,
    {
        EpitopeRepository {
            epitopes: self
                .epitopes
                .iter()
                .filter(|e| predicate(e))
                .cloned()
                .collect(),
        }
    }

    ///
    /// View restricted to the given epitope identifiers.
    ///
    pub fn filter_by_epitope_set(&self, ids: &BTreeSet<String>) -> Self {
        self.filter(|e| ids.contains(&e.id))
    }

    ///
    /// View restricted to epitopes whose exposure score is one of `scores`.
    ///
    pub fn filter_by_exposure(&self, scores: &BTreeSet<ElliProScore>) -> Self {
        self.filter(|e| scores.contains(&e.ellipro_score))
    }

    ///
    /// Invert the table: every allele referenced by the view, mapped to the
    /// identifiers of the epitopes that list it.
    ///
    /// # Arguments
    /// - field: which allele column to read
    pub fn allele_to_epitope_set(&self, field: AlleleField) -> BTreeMap<String, BTreeSet<String>> {
        let mut hla_to_epitopes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for epitope in self.iter() {
            for hla in epitope.alleles(field) {
                hla_to_epitopes
                    .entry(hla.clone())
                    .or_default()
                    .insert(epitope.id.clone());
            }
        }
        hla_to_epitopes
    }

    ///
    /// Residues defining one epitope, in table order.
    ///
    pub fn polymorphic_residues(&self, id: &str) -> Result<Vec<PolymorphicResidue>> {
        self.get(id)
            .map(|e| e.polymorphic_residues.clone())
            .ok_or_else(|| EpitopeError::NotFound(format!("epitope {}", id)))
    }

    ///
    /// Residues of every epitope of the view found in `ids`, flattened in table order.
    /// Identifiers absent from the view are skipped.
    ///
    pub fn polymorphic_residues_of(&self, ids: &BTreeSet<String>) -> Vec<PolymorphicResidue> {
        self.iter()
            .filter(|e| ids.contains(&e.id))
            .flat_map(|e| e.polymorphic_residues.iter().copied())
            .collect()
    }
}

impl TryFrom<&Path> for EpitopeRepository {
    type Error = EpitopeError;

    fn try_from(value: &Path) -> Result<Self> {
        EpitopeRepository::from_json(value)
    }
}

impl TryFrom<PathBuf> for EpitopeRepository {
    type Error = EpitopeError;

    fn try_from(value: PathBuf) -> Result<Self> {
        EpitopeRepository::from_json(value)
    }
}
