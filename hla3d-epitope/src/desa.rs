//! Donor-specific epitope (DESA) profiles of transplants.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hla3d_core::get_class;
use hla3d_core::utils::get_dynamic_reader;

use crate::error::{EpitopeError, Result};

pub type TransplantId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonorType {
    Deceased,
    Living,
}

impl Display for DonorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DonorType::Deceased => write!(f, "Deceased"),
            DonorType::Living => write!(f, "Living"),
        }
    }
}

///
/// A transplant record: which donor allele carries each donor-specific epitope.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transplant {
    pub transplant_id: TransplantId,
    pub epitope_to_donor_hla: BTreeMap<String, String>,
    #[serde(default)]
    pub donor_type: Option<DonorType>,
    #[serde(default)]
    pub failure: Option<bool>,
    #[serde(default)]
    pub survival_years: Option<f64>,
}

impl Transplant {
    pub fn donor_hlas(&self) -> BTreeSet<String> {
        self.epitope_to_donor_hla.values().cloned().collect()
    }

    /// Class summary of the donor alleles, `I`, `II` or `I,II`.
    pub fn hla_class(&self) -> String {
        get_class(self.epitope_to_donor_hla.values().map(String::as_str))
    }

    pub fn hla_to_epitope_set(&self) -> BTreeMap<String, BTreeSet<String>> {
        hla_to_epitope_set(&self.epitope_to_donor_hla)
    }
}

///
/// Group an epitope -> donor allele mapping by allele.
///
pub fn hla_to_epitope_set(
    epitope_to_hla: &BTreeMap<String, String>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (epitope, hla) in epitope_to_hla {
        grouped
            .entry(hla.clone())
            .or_default()
            .insert(epitope.clone());
    }
    grouped
}

///
/// Source of donor epitope profiles keyed by transplant id.
///
pub trait DonorProfileSource {
    fn donor_profile(&self, transplant_id: TransplantId) -> Option<&BTreeMap<String, String>>;

    fn contains(&self, transplant_id: TransplantId) -> bool {
        self.donor_profile(transplant_id).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DesaRepository {
    transplants: BTreeMap<TransplantId, Transplant>,
}

impl DesaRepository {
    pub fn new(transplants: Vec<Transplant>) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        for transplant in transplants {
            let id = transplant.transplant_id;
            if by_id.insert(id, transplant).is_some() {
                return Err(EpitopeError::InvalidInput(format!(
                    "duplicate transplant id in DESA table: {}",
                    id
                )));
            }
        }
        Ok(DesaRepository {
            transplants: by_id,
        })
    }

    ///
    /// Load donor profiles from a JSON array of transplant records.
    ///
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = get_dynamic_reader(path.as_ref())?;
        let transplants: Vec<Transplant> = serde_json::from_reader(reader)?;
        log::info!(
            "Loaded {} transplants from {}",
            transplants.len(),
            path.as_ref().display()
        );
        DesaRepository::new(transplants)
    }

    pub fn len(&self) -> usize {
        self.transplants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transplants.is_empty()
    }

    pub fn get(&self, transplant_id: TransplantId) -> Option<&Transplant> {
        self.transplants.get(&transplant_id)
    }

    pub fn transplant_ids(&self) -> Vec<TransplantId> {
        self.transplants.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transplant> {
        self.transplants.values()
    }

    ///
    /// Transplants whose donor alleles fall in the given class summary (`I`, `II` or `I,II`).
    ///
    pub fn with_class(&self, class: &str) -> Vec<&Transplant> {
        self.iter().filter(|t| t.hla_class() == class).collect()
    }
}

impl DonorProfileSource for DesaRepository {
    fn donor_profile(&self, transplant_id: TransplantId) -> Option<&BTreeMap<String, String>> {
        self.get(transplant_id).map(|t| &t.epitope_to_donor_hla)
    }
}

impl TryFrom<&Path> for DesaRepository {
    type Error = EpitopeError;

    fn try_from(value: &Path) -> Result<Self> {
        DesaRepository::from_json(value)
    }
}

impl TryFrom<PathBuf> for DesaRepository {
    type Error = EpitopeError;

    fn try_from(value: PathBuf) -> Result<Self> {
        DesaRepository::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn desa() -> DesaRepository {
        let path = std::env::current_dir()
            .unwrap()
            .join("../tests/data/desa.json");
        DesaRepository::try_from(path).unwrap()
    }

    #[rstest]
    fn test_load(desa: DesaRepository) {
        assert_eq!(desa.len(), 3);
        assert_eq!(desa.transplant_ids(), vec![1402, 2001, 3003]);
        assert!(desa.contains(1402));
        assert!(!desa.contains(9999));
    }

    #[rstest]
    fn test_transplant_fields(desa: DesaRepository) {
        let transplant = desa.get(1402).unwrap();
        assert_eq!(transplant.donor_type, Some(DonorType::Deceased));
        assert_eq!(transplant.failure, Some(true));

        let unknown = desa.get(3003).unwrap();
        assert_eq!(unknown.donor_type, None);
        assert_eq!(unknown.survival_years, None);
    }

    #[rstest]
    fn test_donor_hlas_and_class(desa: DesaRepository) {
        let transplant = desa.get(1402).unwrap();
        assert_eq!(
            transplant.donor_hlas(),
            BTreeSet::from([
                "A*11:01".to_string(),
                "B*57:01".to_string(),
                "C*03:03".to_string(),
                "DQB1*06:01".to_string(),
            ])
        );
        assert_eq!(transplant.hla_class(), "I,II");
        assert_eq!(desa.get(3003).unwrap().hla_class(), "II");
    }

    #[rstest]
    fn test_with_class(desa: DesaRepository) {
        let ids: Vec<TransplantId> = desa.with_class("I").iter().map(|t| t.transplant_id).collect();
        assert_eq!(ids, vec![2001]);
    }

    #[rstest]
    fn test_hla_to_epitope_set() {
        let profile = BTreeMap::from([
            ("62QE".to_string(), "A*11:01".to_string()),
            ("74Y".to_string(), "A*11:01".to_string()),
            ("44RME".to_string(), "B*57:01".to_string()),
        ]);
        let grouped = hla_to_epitope_set(&profile);

        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped["A*11:01"],
            BTreeSet::from(["62QE".to_string(), "74Y".to_string()])
        );
    }

    #[rstest]
    fn test_rejects_duplicate_ids() {
        let transplant = Transplant {
            transplant_id: 7,
            epitope_to_donor_hla: BTreeMap::new(),
            donor_type: None,
            failure: None,
            survival_years: None,
        };
        let result = DesaRepository::new(vec![transplant.clone(), transplant]);
        assert!(matches!(result, Err(EpitopeError::InvalidInput(_))));
    }
}
