//! Resolution of HLA alleles to files of the structural inventory.
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hla3d_core::{get_hla_from_filename, locus_directory, parse_allele, structure_stem};

///
/// Anything able to answer "which structural file belongs to this allele".
///
/// An allele without a structure is routine, so lookups answer with `None`
/// rather than an error.
///
pub trait StructureLookup {
    fn resolve(&self, hla: &str) -> Option<PathBuf>;

    fn has_structure(&self, hla: &str) -> bool {
        self.resolve(hla).is_some()
    }
}

///
/// Locator over an inventory laid out as `<base_dir>/<XX>/<Locus>_<group>_<subtype>_V1.pdb`,
/// where `XX` is the first two characters of the locus letters.
///
#[derive(Debug, Clone)]
pub struct StructureFileLocator {
    base_dir: PathBuf,
}

impl StructureFileLocator {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        StructureFileLocator {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    ///
    /// Find the first file, by filename order, of a locus directory whose name contains `stem`.
    ///
    /// # Arguments
    /// - locus: locus letters, e.g. `DRB`
    /// - stem: canonical structure stem, e.g. `DRB1_04_01`
    pub fn find_molecule_path(&self, locus: &str, stem: &str) -> Option<PathBuf> {
        let directory = self.base_dir.join(locus_directory(locus));
        let mut names = match sorted_file_names(&directory) {
            Ok(names) => names,
            Err(e) => {
                log::debug!("Can't list {}: {}", directory.display(), e);
                return None;
            }
        };
        names.retain(|name| name.contains(stem));
        names.into_iter().next().map(|name| directory.join(name))
    }

    ///
    /// All alleles of the inventory, grouped by locus directory.
    ///
    pub fn inventory(&self) -> io::Result<BTreeMap<String, BTreeSet<String>>> {
        get_inventory_hlas(&self.base_dir)
    }
}

impl StructureLookup for StructureFileLocator {
    fn resolve(&self, hla: &str) -> Option<PathBuf> {
        let parts = match parse_allele(hla) {
            Ok(parts) => parts,
            Err(e) => {
                log::debug!("No structure lookup possible: {}", e);
                return None;
            }
        };
        let stem = structure_stem(hla).ok()?;
        let path = self.find_molecule_path(parts.locus, &stem);
        if path.is_none() {
            log::debug!("No structural file for {}", hla);
        }
        path
    }
}

fn sorted_file_names(directory: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

///
/// Index every allele present in a structural inventory.
///
/// Each locus subdirectory maps to the alleles encoded in its filenames;
/// heterodimer files contribute both of their alleles.
///
/// # Arguments
/// - base_dir: root of the inventory
pub fn get_inventory_hlas(base_dir: &Path) -> io::Result<BTreeMap<String, BTreeSet<String>>> {
    let mut inventory: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for entry in fs::read_dir(base_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(locus) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let alleles = inventory.entry(locus).or_default();
        for name in sorted_file_names(&entry.path())? {
            alleles.extend(get_hla_from_filename(&name));
        }
    }

    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn get_test_path() -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/structures")
    }

    #[fixture]
    fn locator() -> StructureFileLocator {
        StructureFileLocator::new(get_test_path())
    }

    #[rstest]
    #[case("A*11:01", "A/A_11_01_V1.pdb")]
    #[case("B*57:01", "B/B_57_01_V1.pdb")]
    #[case("DQA1*01:03", "DQ/DQA1_01_03-DQB1_06_01_V1.pdb")]
    #[case("DQB1*06:01", "DQ/DQA1_01_03-DQB1_06_01_V1.pdb")]
    fn test_resolve_known(
        locator: StructureFileLocator,
        #[case] hla: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(locator.resolve(hla), Some(get_test_path().join(expected)));
    }

    #[rstest]
    #[case("ZZ*99:99")]
    #[case("C*03:03")]
    #[case("DRB1*04:01")]
    #[case("not-an-allele")]
    fn test_resolve_absent(locator: StructureFileLocator, #[case] hla: &str) {
        assert_eq!(locator.resolve(hla), None);
        assert!(!locator.has_structure(hla));
    }

    #[rstest]
    fn test_first_match_by_name() {
        let tempdir = tempfile::tempdir().unwrap();
        let locus_dir = tempdir.path().join("DR");
        fs::create_dir(&locus_dir).unwrap();
        for name in ["DRB1_15_01_V2.pdb", "DRB1_15_01_V1.pdb", "DRB1_15_02_V1.pdb"] {
            fs::write(locus_dir.join(name), "END\n").unwrap();
        }

        let locator = StructureFileLocator::new(tempdir.path());
        assert_eq!(
            locator.resolve("DRB1*15:01"),
            Some(locus_dir.join("DRB1_15_01_V1.pdb"))
        );
    }

    #[rstest]
    fn test_inventory(locator: StructureFileLocator) {
        let inventory = locator.inventory().unwrap();

        assert_eq!(
            inventory.keys().cloned().collect::<Vec<_>>(),
            vec!["A", "B", "DQ"]
        );
        assert_eq!(
            inventory["A"],
            BTreeSet::from(["A*11:01".to_string(), "A*24:02".to_string()])
        );
        assert_eq!(
            inventory["DQ"],
            BTreeSet::from(["DQA1*01:03".to_string(), "DQB1*06:01".to_string()])
        );
    }

    #[rstest]
    fn test_inventory_missing_dir() {
        assert!(get_inventory_hlas(Path::new("does/not/exist")).is_err());
    }
}
