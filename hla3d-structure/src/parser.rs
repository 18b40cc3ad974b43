//! Fixed-width coordinate file parser.
//!
//! Column convention (PDB v3.3, 1-based inclusive):
//!
//! | field              | columns |
//! |--------------------|---------|
//! | record type        | 1-6     |
//! | atom serial        | 7-11    |
//! | atom name          | 13-16   |
//! | residue name       | 18-20   |
//! | chain id           | 22      |
//! | residue sequence   | 23-26   |
//! | x, y, z            | 31-38, 39-46, 47-54 |
//! | occupancy          | 55-60   |
//! | temperature factor | 61-66   |
//! | element symbol     | 77-78   |
//!
//! Only `ATOM` and `HETATM` records of the first model are read, every other line is ignored.
use std::fmt::{self, Display};
use std::io::BufRead;
use std::ops::Range;
use std::path::{Path, PathBuf};

use hla3d_core::utils::get_dynamic_reader;

use crate::bonds::{Bond, infer_bonds};
use crate::error::{Result, StructureError};

/// Zero-based, end-exclusive byte ranges of the fixed-column fields.
pub mod columns {
    use std::ops::Range;

    pub const RECORD: Range<usize> = 0..6;
    pub const SERIAL: Range<usize> = 6..11;
    pub const ATOM_NAME: Range<usize> = 12..16;
    pub const RESIDUE_NAME: Range<usize> = 17..20;
    pub const CHAIN: Range<usize> = 21..22;
    pub const RESIDUE_SEQ: Range<usize> = 22..26;
    pub const X: Range<usize> = 30..38;
    pub const Y: Range<usize> = 38..46;
    pub const Z: Range<usize> = 46..54;
    pub const OCCUPANCY: Range<usize> = 54..60;
    pub const TEMP_FACTOR: Range<usize> = 60..66;
    pub const ELEMENT: Range<usize> = 76..78;

    /// Shortest line that still carries all three coordinates.
    pub const MIN_ATOM_LINE: usize = 54;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Atom,
    HetAtom,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Atom => write!(f, "ATOM"),
            RecordKind::HetAtom => write!(f, "HETATM"),
        }
    }
}

///
/// One ATOM/HETATM record of a structural file.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Stable zero-based index in file order
    pub index: usize,
    pub kind: RecordKind,
    /// Serial number as written in the file
    pub serial: u32,
    pub name: String,
    pub residue_name: String,
    pub chain: String,
    /// Residue sequence number as written in the file
    pub residue_seq: i32,
    /// One-based counter that increments whenever the residue sequence number changes
    pub residue_index: usize,
    pub position: [f64; 3],
    pub occupancy: Option<f64>,
    pub temp_factor: Option<f64>,
    pub element: String,
}

impl Atom {
    pub fn is_hetero(&self) -> bool {
        self.kind == RecordKind::HetAtom
    }
}

///
/// Parsed structural file: the atoms in file order and the bonds between them.
///
#[derive(Debug, Clone)]
pub struct StructureRecord {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub path: Option<PathBuf>,
}

impl StructureRecord {
    ///
    /// Parse a structural file from any buffered reader.
    ///
    /// # Arguments
    /// - reader: the fixed-width text
    /// - source: name used in error messages (usually the file path)
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut atoms: Vec<Atom> = Vec::new();
        let mut previous_seq: Option<i32> = None;
        let mut residue_index: usize = 0;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;

            let record = field(&line, columns::RECORD).unwrap_or_default();
            let kind = match record {
                "ATOM" => RecordKind::Atom,
                "HETATM" => RecordKind::HetAtom,
                "ENDMDL" => break,
                _ => continue,
            };

            let parse_error = |reason: String| StructureError::Parse {
                path: source.to_string(),
                line: line_number + 1,
                reason,
            };

            if line.len() < columns::MIN_ATOM_LINE {
                return Err(parse_error(format!(
                    "{} record is {} characters long, at least {} are required",
                    kind,
                    line.len(),
                    columns::MIN_ATOM_LINE
                )));
            }

            let serial = parse_required::<u32>(&line, columns::SERIAL)
                .map_err(|e| parse_error(format!("atom serial: {}", e)))?;
            let residue_seq = parse_required::<i32>(&line, columns::RESIDUE_SEQ)
                .map_err(|e| parse_error(format!("residue sequence number: {}", e)))?;
            let x = parse_coordinate(&line, columns::X)
                .map_err(|e| parse_error(format!("x coordinate: {}", e)))?;
            let y = parse_coordinate(&line, columns::Y)
                .map_err(|e| parse_error(format!("y coordinate: {}", e)))?;
            let z = parse_coordinate(&line, columns::Z)
                .map_err(|e| parse_error(format!("z coordinate: {}", e)))?;
            let occupancy = parse_optional::<f64>(&line, columns::OCCUPANCY)
                .map_err(|e| parse_error(format!("occupancy: {}", e)))?;
            let temp_factor = parse_optional::<f64>(&line, columns::TEMP_FACTOR)
                .map_err(|e| parse_error(format!("temperature factor: {}", e)))?;

            let name = field(&line, columns::ATOM_NAME)
                .unwrap_or_default()
                .to_string();
            let element = match field(&line, columns::ELEMENT) {
                Some(symbol) if !symbol.is_empty() => symbol.to_uppercase(),
                _ => element_from_atom_name(&name),
            };

            if previous_seq != Some(residue_seq) {
                residue_index += 1;
                previous_seq = Some(residue_seq);
            }

            atoms.push(Atom {
                index: atoms.len(),
                kind,
                serial,
                name,
                residue_name: field(&line, columns::RESIDUE_NAME)
                    .unwrap_or_default()
                    .to_string(),
                chain: field(&line, columns::CHAIN).unwrap_or_default().to_string(),
                residue_seq,
                residue_index,
                position: [x, y, z],
                occupancy,
                temp_factor,
                element,
            });
        }

        if atoms.is_empty() {
            return Err(StructureError::EmptyStructure(source.to_string()));
        }

        let bonds = infer_bonds(&atoms);

        Ok(StructureRecord {
            atoms,
            bonds,
            path: None,
        })
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    ///
    /// Chain identifiers in order of first appearance.
    ///
    pub fn chain_ids(&self) -> Vec<String> {
        let mut chains: Vec<String> = Vec::new();
        for atom in &self.atoms {
            if !chains.contains(&atom.chain) {
                chains.push(atom.chain.clone());
            }
        }
        chains
    }

    ///
    /// Residue name found at a residue sequence number of a chain, if present.
    ///
    pub fn residue_name_at(&self, chain: &str, residue_seq: i32) -> Option<&str> {
        self.atoms
            .iter()
            .find(|a| a.chain == chain && a.residue_seq == residue_seq)
            .map(|a| a.residue_name.as_str())
    }

    pub fn source_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

impl TryFrom<&Path> for StructureRecord {
    type Error = StructureError;

    ///
    /// Parse a structural file (plain or gzip-compressed) from disk.
    ///
    /// # Arguments:
    /// - value: path to the file on disk.
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;
        let mut record = StructureRecord::from_reader(reader, &value.display().to_string())?;
        record.path = Some(value.to_owned());
        Ok(record)
    }
}

impl TryFrom<&str> for StructureRecord {
    type Error = StructureError;

    fn try_from(value: &str) -> Result<Self> {
        StructureRecord::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for StructureRecord {
    type Error = StructureError;

    fn try_from(value: PathBuf) -> Result<Self> {
        StructureRecord::try_from(value.as_path())
    }
}

/// Trimmed content of a column range, clipped to the line length.
fn field(line: &str, range: Range<usize>) -> Option<&str> {
    if range.start >= line.len() {
        return None;
    }
    let end = range.end.min(line.len());
    line.get(range.start..end).map(str::trim)
}

fn parse_required<T>(line: &str, range: Range<usize>) -> std::result::Result<T, String>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    let value = field(line, range).unwrap_or_default();
    if value.is_empty() {
        return Err("field is blank".to_string());
    }
    value
        .parse::<T>()
        .map_err(|e| format!("can't parse '{}' ({})", value, e))
}

fn parse_coordinate(line: &str, range: Range<usize>) -> std::result::Result<f64, String> {
    let value = parse_required::<f64>(line, range)?;
    if !value.is_finite() {
        return Err("not finite".to_string());
    }
    Ok(value)
}

fn parse_optional<T>(line: &str, range: Range<usize>) -> std::result::Result<Option<T>, String>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match field(line, range) {
        None => Ok(None),
        Some("") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("can't parse '{}' ({})", value, e)),
    }
}

/// First alphabetic character of the atom name, used when the element column is blank.
fn element_from_atom_name(name: &str) -> String {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/structures")
            .join(file_name)
    }

    #[fixture]
    fn a1101() -> StructureRecord {
        StructureRecord::try_from(get_test_path("A/A_11_01_V1.pdb").as_path()).unwrap()
    }

    #[rstest]
    fn test_open_from_path(a1101: StructureRecord) {
        assert_eq!(a1101.atom_count(), 41);
        assert_eq!(a1101.chain_ids(), vec!["A", "B"]);
        assert!(a1101.path.is_some());
    }

    #[rstest]
    fn test_open_from_string() {
        let path = get_test_path("B/B_57_01_V1.pdb");
        assert!(StructureRecord::try_from(path.to_str().unwrap()).is_ok());
    }

    #[rstest]
    fn test_first_atom_columns(a1101: StructureRecord) {
        let atom = &a1101.atoms[0];
        assert_eq!(atom.index, 0);
        assert_eq!(atom.kind, RecordKind::Atom);
        assert_eq!(atom.serial, 1);
        assert_eq!(atom.name, "N");
        assert_eq!(atom.residue_name, "HIS");
        assert_eq!(atom.chain, "A");
        assert_eq!(atom.residue_seq, 9);
        assert_eq!(atom.residue_index, 1);
        assert_eq!(atom.position, [0.0, 0.0, 0.0]);
        assert_eq!(atom.occupancy, Some(1.0));
        assert_eq!(atom.temp_factor, Some(20.0));
        assert_eq!(atom.element, "N");
    }

    #[rstest]
    fn test_residue_index_follows_sequence_changes(a1101: StructureRecord) {
        // residues 9, 62, 63, 66, 74, 77, 144, 145 on chain A, then 1 and 62 on chain B
        let indices: Vec<usize> = a1101.atoms.iter().map(|a| a.residue_index).collect();
        assert_eq!(indices[0..4], [1, 1, 1, 1]);
        assert_eq!(indices[4..8], [2, 2, 2, 2]);
        assert_eq!(a1101.atoms[39].residue_index, 10);
        // the trailing water gets its own residue
        assert_eq!(a1101.atoms[40].residue_index, 11);
        assert!(a1101.atoms[40].is_hetero());
    }

    #[rstest]
    fn test_residue_name_at(a1101: StructureRecord) {
        assert_eq!(a1101.residue_name_at("A", 62), Some("GLN"));
        assert_eq!(a1101.residue_name_at("B", 62), Some("GLU"));
        assert_eq!(a1101.residue_name_at("A", 500), None);
    }

    #[rstest]
    fn test_parse_is_deterministic() {
        let path = get_test_path("A/A_11_01_V1.pdb");
        let first = StructureRecord::try_from(path.as_path()).unwrap();
        let second = StructureRecord::try_from(path.as_path()).unwrap();
        assert_eq!(first.atoms, second.atoms);
        assert_eq!(first.bonds, second.bonds);
    }

    #[rstest]
    fn test_malformed_coordinates() {
        let path = get_test_path("A/A_24_02_V1.pdb");
        let result = StructureRecord::try_from(path.as_path());
        assert!(matches!(result, Err(StructureError::Parse { line: 3, .. })));
    }

    #[rstest]
    #[case("     inf")]
    #[case("     NaN")]
    #[case("-inf    ")]
    fn test_non_finite_coordinate(#[case] x: &str) {
        let text = format!(
            "ATOM      1  N   GLU A  62       1.000   0.000   0.000  1.00 20.00           N\n\
             ATOM      2  CA  GLU A  62    {}   0.000   0.000  1.00 20.00           C\n",
            x
        );
        let result = StructureRecord::from_reader(Cursor::new(text), "inf.pdb");
        match result {
            Err(StructureError::Parse { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(reason, "x coordinate: not finite");
            }
            other => panic!("expected a parse error, got {:?}", other.map(|r| r.atom_count())),
        }
    }

    #[rstest]
    fn test_no_atom_records() {
        let text = "HEADER    EMPTY\nREMARK   1 nothing here\nEND\n";
        let result = StructureRecord::from_reader(Cursor::new(text), "empty.pdb");
        assert!(matches!(result, Err(StructureError::EmptyStructure(_))));
    }

    #[rstest]
    fn test_truncated_record() {
        let text = "ATOM      1  N   HIS A   9       0.000   0.000\n";
        let result = StructureRecord::from_reader(Cursor::new(text), "short.pdb");
        assert!(matches!(result, Err(StructureError::Parse { line: 1, .. })));
    }

    #[rstest]
    fn test_element_falls_back_to_atom_name() {
        // no occupancy, temperature factor or element columns
        let text = "ATOM      1  CA  GLY A   1      11.104   6.134  -6.504\n";
        let record = StructureRecord::from_reader(Cursor::new(text), "short.pdb").unwrap();
        assert_eq!(record.atoms[0].element, "C");
        assert_eq!(record.atoms[0].occupancy, None);
        assert_eq!(record.atoms[0].temp_factor, None);
    }

    #[rstest]
    fn test_only_first_model_is_read() {
        let text = "MODEL        1\n\
                    ATOM      1  CA  GLY A   1      11.104   6.134  -6.504\n\
                    ENDMDL\n\
                    MODEL        2\n\
                    ATOM      1  CA  GLY A   1      11.204   6.234  -6.604\n\
                    ENDMDL\n";
        let record = StructureRecord::from_reader(Cursor::new(text), "nmr.pdb").unwrap();
        assert_eq!(record.atom_count(), 1);
    }

    #[rstest]
    fn test_open_gzipped(a1101: StructureRecord) {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("A_11_01_V1.pdb.gz");

        let text = std::fs::read(get_test_path("A/A_11_01_V1.pdb")).unwrap();
        let mut encoder =
            GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(&text).unwrap();
        encoder.finish().unwrap();

        let record = StructureRecord::try_from(path.as_path()).unwrap();
        assert_eq!(record.atoms, a1101.atoms);
    }

    #[rstest]
    fn test_missing_file() {
        let result = StructureRecord::try_from(get_test_path("A/A_99_99_V1.pdb").as_path());
        assert!(matches!(result, Err(StructureError::Io(_))));
    }
}
