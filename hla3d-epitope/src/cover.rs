//! Greedy minimum HLA cover of an epitope set.
//!
//! Each round picks the candidate allele whose epitopes overlap the uncovered
//! targets the most, assigns it that overlap and removes it from the targets.
//! Candidates are visited in ascending allele order and the first maximum wins,
//! so the cover is reproducible for a given repository.
//!
//! The number of rounds is capped ([DEFAULT_MAX_ITERATIONS] unless configured).
//! Targets still uncovered once the cap is reached, or once no candidate
//! overlaps them, are reported as `unassigned`.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use hla3d_core::flatten_dict_values;
use hla3d_structure::StructureLookup;

use crate::models::AlleleField;
use crate::repository::EpitopeRepository;

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverOptions {
    /// Alleles never selected
    pub exclude: BTreeSet<String>,
    /// Drop candidates without a structural file
    pub restrict_to_known_structures: bool,
    /// When set, candidates are drawn from these alleles only, with no fallback
    pub preference: Option<BTreeSet<String>>,
    pub max_iterations: usize,
    pub allele_field: AlleleField,
}

impl Default for CoverOptions {
    fn default() -> Self {
        CoverOptions {
            exclude: BTreeSet::new(),
            restrict_to_known_structures: true,
            preference: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            allele_field: AlleleField::Luminex,
        }
    }
}

///
/// One selected allele and the target epitopes it was assigned.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HlaAssignment {
    pub hla: String,
    pub epitopes: BTreeSet<String>,
}

///
/// Result of a cover: assignments in selection order plus whatever could not be placed.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageAssignment {
    pub assignments: Vec<HlaAssignment>,
    /// Known epitopes no candidate allele could cover
    pub unassigned: BTreeSet<String>,
    /// Targets absent from the repository view
    pub unknown: BTreeSet<String>,
}

impl CoverageAssignment {
    pub fn alleles(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.hla.as_str()).collect()
    }

    pub fn get(&self, hla: &str) -> Option<&BTreeSet<String>> {
        self.assignments
            .iter()
            .find(|a| a.hla == hla)
            .map(|a| &a.epitopes)
    }

    /// Union of all assigned epitope sets.
    pub fn covered(&self) -> BTreeSet<String> {
        flatten_dict_values(self.assignments.iter().map(|a| &a.epitopes))
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty() && self.unknown.is_empty()
    }
}

pub struct MinimumHlaCover<'a> {
    repository: &'a EpitopeRepository,
    structures: Option<&'a dyn StructureLookup>,
}

impl<'a> MinimumHlaCover<'a> {
    pub fn new(repository: &'a EpitopeRepository) -> Self {
        MinimumHlaCover {
            repository,
            structures: None,
        }
    }

    ///
    /// Use a structural inventory to honour `restrict_to_known_structures`.
    ///
    pub fn with_structures(mut self, structures: &'a dyn StructureLookup) -> Self {
        self.structures = Some(structures);
        self
    }

    fn candidates(&self, options: &CoverOptions) -> BTreeMap<String, BTreeSet<String>> {
        let mut candidates = self.repository.allele_to_epitope_set(options.allele_field);

        candidates.retain(|hla, _| !options.exclude.contains(hla));

        if let Some(preference) = &options.preference {
            candidates.retain(|hla, _| preference.contains(hla));
        }

        if options.restrict_to_known_structures {
            match self.structures {
                Some(structures) => candidates.retain(|hla, _| structures.has_structure(hla)),
                None => log::warn!(
                    "No structural inventory given, cover candidates are not restricted to known structures"
                ),
            }
        }

        candidates
    }

    ///
    /// Compute the cover of a target epitope set.
    ///
    /// # Arguments
    /// - targets: epitope identifiers to cover
    /// - options: candidate restrictions and iteration cap
    pub fn cover(&self, targets: &BTreeSet<String>, options: &CoverOptions) -> CoverageAssignment {
        let (mut remaining, unknown): (BTreeSet<String>, BTreeSet<String>) = targets
            .iter()
            .cloned()
            .partition(|id| self.repository.contains(id));

        if !unknown.is_empty() {
            log::warn!(
                "Epitopes absent from the epitope table: {}",
                unknown.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        let candidates = self.candidates(options);
        let mut assignments: Vec<HlaAssignment> = Vec::new();

        for _ in 0..options.max_iterations {
            if remaining.is_empty() {
                break;
            }

            let mut best: Option<(&String, BTreeSet<String>)> = None;
            for (hla, epitopes) in &candidates {
                let hits: BTreeSet<String> = epitopes.intersection(&remaining).cloned().collect();
                if hits.is_empty() {
                    continue;
                }
                if best.as_ref().is_none_or(|(_, b)| hits.len() > b.len()) {
                    best = Some((hla, hits));
                }
            }

            let Some((hla, hits)) = best else {
                log::debug!("No candidate allele covers the remaining epitopes");
                break;
            };

            log::debug!("Selected {} covering {} epitopes", hla, hits.len());
            remaining.retain(|id| !hits.contains(id));
            assignments.push(HlaAssignment {
                hla: hla.clone(),
                epitopes: hits,
            });
        }

        if !remaining.is_empty() {
            log::warn!(
                "{} epitopes left unassigned after {} alleles: {}",
                remaining.len(),
                assignments.len(),
                remaining.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        CoverageAssignment {
            assignments,
            unassigned: remaining,
            unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::models::{ElliProScore, Epitope, PolymorphicResidue};

    const REFERENCE_SET: [&str; 21] = [
        "105S", "113HN", "114H", "114Q", "116L", "131S", "144QL", "44RME", "62EE", "62QE",
        "63NI", "65QIA", "66IS", "66IY", "66NH", "70IAQ", "71TD", "74Y", "77D", "99S", "9H",
    ];

    struct KnownStructures(BTreeSet<&'static str>);

    impl StructureLookup for KnownStructures {
        fn resolve(&self, hla: &str) -> Option<PathBuf> {
            self.0
                .contains(hla)
                .then(|| Path::new("structures").join(hla.replace(['*', ':'], "_")))
        }
    }

    #[fixture]
    fn repository() -> EpitopeRepository {
        let path = std::env::current_dir()
            .unwrap()
            .join("../tests/data/epitopes.json");
        EpitopeRepository::from_json(path).unwrap()
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn unrestricted() -> CoverOptions {
        CoverOptions {
            restrict_to_known_structures: false,
            ..Default::default()
        }
    }

    fn epitope(id: &str, alleles: &[&str]) -> Epitope {
        Epitope {
            id: id.to_string(),
            polymorphic_residues: vec![PolymorphicResidue::from((1, 'A'))],
            luminex_alleles: set(alleles),
            all_alleles: BTreeSet::new(),
            antibody_reactivity: false,
            monoclonal: false,
            isotype: None,
            ellipro_score: ElliProScore::High,
        }
    }

    #[rstest]
    fn test_reference_set_is_fully_covered(repository: EpitopeRepository) {
        let targets = set(&REFERENCE_SET);
        let cover = MinimumHlaCover::new(&repository).cover(&targets, &unrestricted());

        assert_eq!(cover.covered(), targets);
        assert!(cover.is_complete());
    }

    #[rstest]
    fn test_selection_order(repository: EpitopeRepository) {
        let cover = MinimumHlaCover::new(&repository).cover(&set(&REFERENCE_SET), &unrestricted());

        // A*24:02 and C*03:03 tie in the third round, the first allele wins
        assert_eq!(
            cover.alleles(),
            vec!["A*11:01", "B*57:01", "A*24:02", "C*03:03"]
        );
        assert_eq!(
            cover.get("A*11:01"),
            Some(&set(&[
                "144QL", "62QE", "65QIA", "66NH", "70IAQ", "74Y", "77D", "9H"
            ]))
        );
        assert_eq!(cover.get("C*03:03"), Some(&set(&["105S", "116L", "99S"])));
    }

    #[rstest]
    fn test_assigned_sets_are_disjoint(repository: EpitopeRepository) {
        let cover = MinimumHlaCover::new(&repository).cover(&set(&REFERENCE_SET), &unrestricted());
        let total: usize = cover.assignments.iter().map(|a| a.epitopes.len()).sum();
        assert_eq!(total, REFERENCE_SET.len());
    }

    #[rstest]
    fn test_unknown_epitopes_are_reported(repository: EpitopeRepository) {
        let cover =
            MinimumHlaCover::new(&repository).cover(&set(&["62EE", "99X"]), &unrestricted());

        assert_eq!(cover.covered(), set(&["62EE"]));
        assert_eq!(cover.unknown, set(&["99X"]));
        assert!(cover.unassigned.is_empty());
    }

    #[rstest]
    fn test_restrict_to_known_structures(repository: EpitopeRepository) {
        let structures = KnownStructures(BTreeSet::from(["A*11:01", "A*24:02", "B*57:01"]));
        let cover = MinimumHlaCover::new(&repository)
            .with_structures(&structures)
            .cover(&set(&REFERENCE_SET), &CoverOptions::default());

        assert_eq!(cover.alleles(), vec!["A*11:01", "B*57:01", "A*24:02"]);
        assert_eq!(cover.unassigned, set(&["105S", "116L", "99S"]));
    }

    #[rstest]
    fn test_exclude(repository: EpitopeRepository) {
        let options = CoverOptions {
            exclude: set(&["A*11:01"]),
            ..unrestricted()
        };
        let cover = MinimumHlaCover::new(&repository).cover(&set(&REFERENCE_SET), &options);

        assert!(!cover.alleles().contains(&"A*11:01"));
        assert_eq!(cover.covered().len() + cover.unassigned.len(), REFERENCE_SET.len());
    }

    #[rstest]
    fn test_preference_does_not_fall_back(repository: EpitopeRepository) {
        let options = CoverOptions {
            preference: Some(set(&["B*57:01"])),
            ..unrestricted()
        };
        let cover = MinimumHlaCover::new(&repository).cover(&set(&["44RME", "62EE"]), &options);

        assert_eq!(cover.alleles(), vec!["B*57:01"]);
        assert_eq!(cover.unassigned, set(&["62EE"]));
    }

    #[rstest]
    fn test_iteration_cap() {
        let epitopes: Vec<Epitope> = (0..12)
            .map(|i| epitope(&format!("{}X", i), &[&format!("A*{:02}:01", i)]))
            .collect();
        let repository = EpitopeRepository::new(epitopes).unwrap();
        let targets = repository.ids();

        let cover = MinimumHlaCover::new(&repository).cover(&targets, &unrestricted());
        assert_eq!(cover.assignments.len(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(cover.unassigned.len(), 2);

        let options = CoverOptions {
            max_iterations: 20,
            ..unrestricted()
        };
        let cover = MinimumHlaCover::new(&repository).cover(&targets, &options);
        assert!(cover.is_complete());
    }

    #[rstest]
    fn test_empty_targets(repository: EpitopeRepository) {
        let cover = MinimumHlaCover::new(&repository).cover(&BTreeSet::new(), &unrestricted());
        assert_eq!(cover, CoverageAssignment::default());
    }
}
