use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::PolymorphicResidue;
use crate::repository::EpitopeRepository;

///
/// Epitope categories displayed on one HLA molecule.
///
/// `desa` holds every epitope assigned to the molecule; the antibody-recognized
/// subsets are drawn from it using the flags of the epitope table.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HlaEpitopeProfile {
    pub desa: BTreeSet<String>,
    pub desa_reactive: BTreeSet<String>,
    pub desa_monoclonal: BTreeSet<String>,
}

///
/// Polymorphic residues of each category of an [HlaEpitopeProfile].
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResidues {
    pub desa: Vec<PolymorphicResidue>,
    pub desa_reactive: Vec<PolymorphicResidue>,
    pub desa_monoclonal: Vec<PolymorphicResidue>,
}

impl HlaEpitopeProfile {
    ///
    /// Categorize the epitopes assigned to one allele. Epitopes absent from
    /// the repository are left out.
    ///
    pub fn from_epitopes(epitopes: &BTreeSet<String>, repository: &EpitopeRepository) -> Self {
        let mut profile = HlaEpitopeProfile::default();
        for id in epitopes {
            let Some(epitope) = repository.get(id) else {
                log::info!("Epitope {} is not in the epitope table, it is not displayed", id);
                continue;
            };
            profile.desa.insert(id.clone());
            if epitope.antibody_reactivity {
                profile.desa_reactive.insert(id.clone());
            }
            if epitope.monoclonal {
                profile.desa_monoclonal.insert(id.clone());
            }
        }
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.desa.is_empty()
    }

    pub fn residues(&self, repository: &EpitopeRepository) -> ProfileResidues {
        ProfileResidues {
            desa: repository.polymorphic_residues_of(&self.desa),
            desa_reactive: repository.polymorphic_residues_of(&self.desa_reactive),
            desa_monoclonal: repository.polymorphic_residues_of(&self.desa_monoclonal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[fixture]
    fn repository() -> EpitopeRepository {
        let path = std::env::current_dir()
            .unwrap()
            .join("../tests/data/epitopes.json");
        EpitopeRepository::from_json(path).unwrap()
    }

    #[rstest]
    fn test_categories(repository: EpitopeRepository) {
        let profile =
            HlaEpitopeProfile::from_epitopes(&set(&["62QE", "74Y", "9H", "99X"]), &repository);

        assert_eq!(profile.desa, set(&["62QE", "74Y", "9H"]));
        assert_eq!(profile.desa_reactive, set(&["62QE"]));
        assert_eq!(profile.desa_monoclonal, set(&["74Y"]));
    }

    #[rstest]
    fn test_residues(repository: EpitopeRepository) {
        let profile = HlaEpitopeProfile::from_epitopes(&set(&["62QE", "74Y"]), &repository);
        let residues = profile.residues(&repository);

        assert_eq!(
            residues.desa,
            vec![
                PolymorphicResidue::from((62, 'Q')),
                PolymorphicResidue::from((63, 'E')),
                PolymorphicResidue::from((74, 'Y')),
            ]
        );
        assert_eq!(residues.desa_monoclonal, vec![PolymorphicResidue::from((74, 'Y'))]);
    }

    #[rstest]
    fn test_empty() {
        let profile = HlaEpitopeProfile::from_epitopes(&set(&["1A"]), &EpitopeRepository::default());
        assert!(profile.is_empty());
    }
}
