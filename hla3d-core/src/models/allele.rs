use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{HlaError, Result};

static ALLELE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)([0-9]*)\*([0-9]+(?::[0-9]+)*)([A-Z]?)$").unwrap()
});

/// Loci whose molecules are class I; every other locus is class II.
const CLASS_I_LOCI: [&str; 3] = ["A", "B", "C"];

///
/// The pieces of an allele identifier such as `DRB1*15:01`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleParts<'a> {
    /// Full gene name, e.g. `DRB1`
    pub gene: &'a str,
    /// Leading letters of the gene, e.g. `DRB`
    pub locus: &'a str,
    /// Colon-delimited specificity fields, e.g. `["15", "01"]`
    pub fields: Vec<&'a str>,
}

///
/// Split an allele identifier into gene, locus letters and specificity fields.
///
/// # Arguments
/// - hla: allele identifier of the form `Locus*group:subtype`
pub fn parse_allele(hla: &str) -> Result<AlleleParts<'_>> {
    let caps = ALLELE_PATTERN
        .captures(hla.trim())
        .ok_or_else(|| HlaError::InvalidAllele(hla.to_string()))?;

    let locus = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let gene_end = caps.get(2).map(|m| m.end()).unwrap_or(locus.len());
    let trimmed = hla.trim();
    let gene = &trimmed[..gene_end];
    let fields: Vec<&str> = caps
        .get(3)
        .map(|m| m.as_str().split(':').collect())
        .unwrap_or_default();

    Ok(AlleleParts {
        gene,
        locus,
        fields,
    })
}

///
/// Get the long locus of an allele: the gene itself for single letter genes,
/// otherwise its first three characters (`DRB3*01:01` -> `DRB`).
///
pub fn get_hla_locus(hla: &str) -> &str {
    let gene = hla.split('*').next().unwrap_or(hla);
    if gene.len() == 1 {
        gene
    } else {
        gene.get(0..3).unwrap_or(gene)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HlaClass {
    I,
    II,
}

impl Display for HlaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HlaClass::I => write!(f, "I"),
            HlaClass::II => write!(f, "II"),
        }
    }
}

///
/// Get the immunological class of an allele from its gene name.
///
pub fn get_hla_class(hla: &str) -> HlaClass {
    let gene = hla.split('*').next().unwrap_or(hla);
    if CLASS_I_LOCI.contains(&gene) {
        HlaClass::I
    } else {
        HlaClass::II
    }
}

///
/// Summarise the classes of a collection of alleles as `I`, `II` or `I,II`.
///
pub fn get_class<'a, I>(alleles: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let classes: BTreeSet<HlaClass> = alleles.into_iter().map(get_hla_class).collect();
    classes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

///
/// Chain of the structure that carries the polymorphic residues of a locus.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolymorphicChain {
    A,
    B,
}

impl PolymorphicChain {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolymorphicChain::A => "A",
            PolymorphicChain::B => "B",
        }
    }
}

impl Display for PolymorphicChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PolymorphicChain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(PolymorphicChain::A),
            "B" | "b" => Ok(PolymorphicChain::B),
            other => Err(format!("Invalid polymorphic chain: {}", other)),
        }
    }
}

///
/// Get the polymorphic chain of an allele from the fixed locus table.
/// Returns `None` for loci outside the table.
///
pub fn get_hla_polychain(hla: &str) -> Option<PolymorphicChain> {
    match get_hla_locus(hla) {
        "A" | "B" | "C" | "DQA" => Some(PolymorphicChain::A),
        "DRB" | "DQB" => Some(PolymorphicChain::B),
        _ => None,
    }
}
