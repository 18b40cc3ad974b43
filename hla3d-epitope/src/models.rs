use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

///
/// Predicted surface exposure of an epitope, ordered from least to most exposed.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElliProScore {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Intermediate,
    High,
}

impl ElliProScore {
    pub const ALL: [ElliProScore; 4] = [
        ElliProScore::VeryLow,
        ElliProScore::Low,
        ElliProScore::Intermediate,
        ElliProScore::High,
    ];
}

impl Display for ElliProScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElliProScore::VeryLow => write!(f, "Very Low"),
            ElliProScore::Low => write!(f, "Low"),
            ElliProScore::Intermediate => write!(f, "Intermediate"),
            ElliProScore::High => write!(f, "High"),
        }
    }
}

impl FromStr for ElliProScore {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "very low" | "verylow" => Ok(ElliProScore::VeryLow),
            "low" => Ok(ElliProScore::Low),
            "intermediate" => Ok(ElliProScore::Intermediate),
            "high" => Ok(ElliProScore::High),
            _ => Err(format!("Invalid ElliPro score: {}", s)),
        }
    }
}

///
/// One polymorphic residue defining an epitope: a sequence position and the
/// one-letter amino-acid code expected there. Serialized as `[62, "E"]`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, char)", into = "(i32, char)")]
pub struct PolymorphicResidue {
    pub position: i32,
    pub amino_acid: char,
}

impl From<(i32, char)> for PolymorphicResidue {
    fn from(value: (i32, char)) -> Self {
        PolymorphicResidue {
            position: value.0,
            amino_acid: value.1,
        }
    }
}

impl From<PolymorphicResidue> for (i32, char) {
    fn from(value: PolymorphicResidue) -> Self {
        (value.position, value.amino_acid)
    }
}

///
/// Which allele-naming column of the epitope table to read.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlleleField {
    /// Alleles of the single-antigen bead panel
    #[default]
    Luminex,
    /// Every allele known to carry the epitope
    All,
}

///
/// A row of the epitope reference table.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epitope {
    #[serde(rename = "epitope")]
    pub id: String,
    pub polymorphic_residues: Vec<PolymorphicResidue>,
    pub luminex_alleles: BTreeSet<String>,
    #[serde(default)]
    pub all_alleles: BTreeSet<String>,
    /// Recognized by a reactive antibody
    #[serde(default)]
    pub antibody_reactivity: bool,
    /// Recognized by a monoclonal antibody
    #[serde(default)]
    pub monoclonal: bool,
    #[serde(default)]
    pub isotype: Option<String>,
    pub ellipro_score: ElliProScore,
}

impl Epitope {
    ///
    /// Alleles listed under a naming column. Tables without an `all_alleles`
    /// column fall back to the Luminex alleles.
    ///
    pub fn alleles(&self, field: AlleleField) -> &BTreeSet<String> {
        match field {
            AlleleField::All if !self.all_alleles.is_empty() => &self.all_alleles,
            _ => &self.luminex_alleles,
        }
    }
}
