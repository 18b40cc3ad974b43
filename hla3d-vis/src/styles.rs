//! Color tables and display options of the 3D molecule viewer.
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hla3d_structure::Atom;

/// Color of atoms whose chain, residue or residue type has no table entry.
pub const DEFAULT_COLOR: &str = "#BEA06E";
/// Color of atoms whose element has no table entry.
pub const DEFAULT_ATOM_COLOR: &str = "#330000";

pub const EPITOPE_COLOR: &str = "#FFFF00";
pub const REACTIVE_ANTIBODY_COLOR: &str = "#FFA500";
pub const MONOCLONAL_ANTIBODY_COLOR: &str = "#FF0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationType {
    #[default]
    Sphere,
    Stick,
    Cartoon,
}

impl Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualizationType::Sphere => write!(f, "sphere"),
            VisualizationType::Stick => write!(f, "stick"),
            VisualizationType::Cartoon => write!(f, "cartoon"),
        }
    }
}

impl FromStr for VisualizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sphere" => Ok(VisualizationType::Sphere),
            "stick" => Ok(VisualizationType::Stick),
            "cartoon" => Ok(VisualizationType::Cartoon),
            _ => Err(format!("Invalid visualization type: {}", s)),
        }
    }
}

///
/// Lookup table used for the base color of every `ATOM` record.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPolicy {
    #[default]
    Chain,
    Residue,
    ResidueType,
    Atom,
}

impl Display for ColorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorPolicy::Chain => write!(f, "chain"),
            ColorPolicy::Residue => write!(f, "residue"),
            ColorPolicy::ResidueType => write!(f, "residue_type"),
            ColorPolicy::Atom => write!(f, "atom"),
        }
    }
}

impl FromStr for ColorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "chain" => Ok(ColorPolicy::Chain),
            "residue" => Ok(ColorPolicy::Residue),
            "residue_type" => Ok(ColorPolicy::ResidueType),
            "atom" => Ok(ColorPolicy::Atom),
            _ => Err(format!("Invalid color policy: {}", s)),
        }
    }
}

impl ColorPolicy {
    ///
    /// Base color of an atom before any epitope override.
    ///
    pub fn base_color(&self, atom: &Atom) -> &'static str {
        match self {
            ColorPolicy::Chain => chain_color(&atom.chain),
            ColorPolicy::Residue => residue_color(&atom.residue_name),
            ColorPolicy::ResidueType => residue_type(&atom.residue_name)
                .map(|t| t.color())
                .unwrap_or(DEFAULT_COLOR),
            ColorPolicy::Atom => atom_color(&atom.element).unwrap_or(DEFAULT_ATOM_COLOR),
        }
    }
}

///
/// Display options shared by every atom of a structure.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub visualization_type: VisualizationType,
    pub color_by: ColorPolicy,
}

///
/// Style of one atom as consumed by the viewer.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub color: String,
    pub visualization_type: VisualizationType,
}

impl StyleEntry {
    pub fn new(color: &str, visualization_type: VisualizationType) -> Self {
        StyleEntry {
            color: color.to_string(),
            visualization_type,
        }
    }
}

pub fn chain_color(chain: &str) -> &'static str {
    match chain {
        "A" => "#65A5E2",
        "B" => "#CA7FE5",
        "C" => "#65E2AB",
        "D" => "#00bfff",
        "E" => "#ff00ff",
        "F" => "#ffff00",
        "G" => "#4682b4",
        "H" => "#ffb6c1",
        "I" => "#a52aaa",
        "J" => "#ee82ee",
        "K" => "#75FF33",
        "L" => "#FFBD33",
        "M" => "#400040",
        "N" => "#004000",
        "O" => "#008080",
        "P" => "#008080",
        "x" => "#9c6677",
        "Y" => "#b7c5c8",
        _ => DEFAULT_COLOR,
    }
}

pub fn residue_color(residue_name: &str) -> &'static str {
    match residue_name.to_uppercase().as_str() {
        "ALA" => "#C8C8C8",
        "ARG" => "#145AFF",
        "ASN" => "#00DCDC",
        "ASP" => "#E60A0A",
        "CYS" => "#E6E600",
        "GLN" => "#00DCDC",
        "GLU" => "#E60A0A",
        "GLY" => "#EBEBEB",
        "HIS" => "#8282D2",
        "ILE" => "#0F820F",
        "LEU" => "#0F820F",
        "LYS" => "#145AFF",
        "MET" => "#E6E600",
        "PHE" => "#3232AA",
        "PRO" => "#DC9682",
        "SER" => "#FA9600",
        "THR" => "#FA9600",
        "TRP" => "#B45AB4",
        "TYR" => "#3232AA",
        "VAL" => "#0F820F",
        "ASX" => "#FF69B4",
        "GLX" => "#FF69B4",
        "A" | "DA" => "#A0A0FF",
        "G" | "DG" => "#FF7070",
        "I" => "#80FFFF",
        "C" | "DC" => "#FF8C4B",
        "T" | "DT" => "#A0FFA0",
        "U" => "#FF8080",
        _ => DEFAULT_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueType {
    Hydrophobic,
    Polar,
    Acidic,
    Basic,
    Aromatic,
    Purine,
    Pyrimidine,
}

impl ResidueType {
    pub fn color(&self) -> &'static str {
        match self {
            ResidueType::Hydrophobic => "#00ff80",
            ResidueType::Polar => "#ff00bf",
            ResidueType::Acidic => "#ff4000",
            ResidueType::Basic => "#0040ff",
            ResidueType::Aromatic => "#ffff00",
            ResidueType::Purine => "#A00042",
            ResidueType::Pyrimidine => "#4F4600",
        }
    }
}

pub fn residue_type(residue_name: &str) -> Option<ResidueType> {
    match residue_name.to_uppercase().as_str() {
        "GLY" | "ALA" | "LEU" | "ILE" | "VAL" | "MET" | "PRO" => Some(ResidueType::Hydrophobic),
        "ASN" | "GLN" | "SER" | "THR" | "CYS" => Some(ResidueType::Polar),
        "ASP" | "GLU" => Some(ResidueType::Acidic),
        "LYS" | "ARG" | "HIS" => Some(ResidueType::Basic),
        "TRP" | "TYR" | "PHE" => Some(ResidueType::Aromatic),
        "A" | "G" | "DA" | "DG" => Some(ResidueType::Purine),
        "DT" | "DC" | "U" | "I" | "C" => Some(ResidueType::Pyrimidine),
        _ => None,
    }
}

pub fn atom_color(element: &str) -> Option<&'static str> {
    match element.to_uppercase().as_str() {
        "C" => Some("#c8c8c8"),
        "H" => Some("#ffffff"),
        "N" => Some("#8f8fff"),
        "S" => Some("#ffc832"),
        "O" => Some("#f00000"),
        "F" => Some("#ffff00"),
        "P" => Some("#ffa500"),
        "K" => Some("#42f4ee"),
        "G" => Some("#3f3f3f"),
        _ => None,
    }
}

///
/// One-letter code of a standard amino acid from its three-letter residue name.
///
pub fn three_to_one(residue_name: &str) -> Option<char> {
    let code = match residue_name.to_uppercase().as_str() {
        "ALA" => 'A',
        "ARG" => 'R',
        "ASN" => 'N',
        "ASP" => 'D',
        "CYS" => 'C',
        "GLN" => 'Q',
        "GLU" => 'E',
        "GLY" => 'G',
        "HIS" => 'H',
        "ILE" => 'I',
        "LEU" => 'L',
        "LYS" => 'K',
        "MET" => 'M',
        "PHE" => 'F',
        "PRO" => 'P',
        "SER" => 'S',
        "THR" => 'T',
        "TRP" => 'W',
        "TYR" => 'Y',
        "VAL" => 'V',
        _ => return None,
    };
    Some(code)
}
