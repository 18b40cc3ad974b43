//! Naming convention of the curated structure inventory.
//!
//! An allele `Locus*group:subtype` is stored as `<Locus>_<group>_<subtype>_V1.pdb`
//! inside a directory named after the first two characters of its locus letters
//! (`A/`, `B/`, `DR/`, `DQ/`). Heterodimer structures join both chains with `-`,
//! e.g. `DQA1_01_03-DQB1_06_01_V1.pdb`.
use std::collections::BTreeSet;
use std::path::Path;

use crate::consts::{HETERODIMER_SEPARATOR, STRUCTURE_FILE_EXT, STRUCTURE_FILE_MARKER};
use crate::errors::Result;
use crate::models::parse_allele;

///
/// Translate an allele to its locus letters and the canonical structure filename.
///
/// # Arguments
/// - hla: allele identifier, e.g. `DRB1*17:19`
///
/// # Returns
/// `("DRB", "DRB1_17_19_V1.pdb")`
pub fn hla_to_filename(hla: &str) -> Result<(String, String)> {
    let stem = structure_stem(hla)?;
    let parts = parse_allele(hla)?;
    Ok((
        parts.locus.to_string(),
        format!("{}{}.{}", stem, STRUCTURE_FILE_MARKER, STRUCTURE_FILE_EXT),
    ))
}

///
/// Canonical stem shared by every file version of an allele's structure,
/// i.e. the gene and specificity fields joined by underscores (`A_01_01`).
///
pub fn structure_stem(hla: &str) -> Result<String> {
    let parts = parse_allele(hla)?;
    let mut pieces = Vec::with_capacity(parts.fields.len() + 1);
    pieces.push(parts.gene);
    pieces.extend(parts.fields.iter().copied());
    Ok(pieces.join("_"))
}

///
/// Directory of the inventory that holds the structures of a locus.
///
pub fn locus_directory(locus: &str) -> &str {
    locus.get(0..2).unwrap_or(locus)
}

///
/// Extract the allele identifiers encoded in a structure filename.
///
/// Segments that do not carry a gene plus two numeric specificity fields
/// are skipped.
///
/// # Arguments
/// - filename: bare filename or path, e.g. `DQA1_01_03-DQB1_06_01_V1.pdb`
pub fn get_hla_from_filename(filename: &str) -> BTreeSet<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let mut hla_set = BTreeSet::new();
    for segment in name.split(HETERODIMER_SEPARATOR) {
        let fields: Vec<&str> = segment.split('_').collect();
        if fields.len() < 3 {
            log::debug!("Skipping segment without specificity fields: {}", segment);
            continue;
        }
        let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if fields[0].is_empty() || !numeric(fields[1]) || !numeric(fields[2]) {
            log::debug!("Skipping malformed segment: {}", segment);
            continue;
        }
        hla_set.insert(format!("{}*{}:{}", fields[0], fields[1], fields[2]));
    }

    hla_set
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::errors::HlaError;

    #[rstest]
    #[case("A*12:12", "A", "A_12_12_V1.pdb")]
    #[case("DRB1*17:19", "DRB", "DRB1_17_19_V1.pdb")]
    #[case("DQA*01:01", "DQA", "DQA_01_01_V1.pdb")]
    fn test_hla_to_filename(#[case] hla: &str, #[case] locus: &str, #[case] name: &str) {
        let (found_locus, found_name) = hla_to_filename(hla).unwrap();
        assert_eq!(found_locus, locus);
        assert_eq!(found_name, name);
    }

    #[rstest]
    fn test_hla_to_filename_rejects_malformed() {
        assert!(matches!(
            hla_to_filename("A-01-01"),
            Err(HlaError::InvalidAllele(_))
        ));
    }

    #[rstest]
    #[case("DQA1_01_03-DQB1_06_01_V1.pdb", &["DQA1*01:03", "DQB1*06:01"])]
    #[case("A_33_01_V1.pdb", &["A*33:01"])]
    #[case("DRB1_01_03_V1.pdb", &["DRB1*01:03"])]
    #[case("data/HLAMolecule/A/A_02_01_V1.pdb", &["A*02:01"])]
    #[case("README.md", &[])]
    fn test_get_hla_from_filename(#[case] filename: &str, #[case] expected: &[&str]) {
        let expected: BTreeSet<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(get_hla_from_filename(filename), expected);
    }

    #[rstest]
    #[case("A*33:01")]
    #[case("B*57:01")]
    #[case("C*03:03")]
    #[case("DRB1*13:05")]
    #[case("DQB1*06:01")]
    fn test_filename_round_trip(#[case] hla: &str) {
        let (_, filename) = hla_to_filename(hla).unwrap();
        assert!(get_hla_from_filename(&filename).contains(hla));
    }

    #[rstest]
    #[case("A", "A")]
    #[case("DRB", "DR")]
    #[case("DQA", "DQ")]
    fn test_locus_directory(#[case] locus: &str, #[case] expected: &str) {
        assert_eq!(locus_directory(locus), expected);
    }

    #[rstest]
    fn test_structure_stem() {
        assert_eq!(structure_stem("DQB1*06:01").unwrap(), "DQB1_06_01");
    }
}
