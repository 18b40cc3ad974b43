//! Per-atom styles of an HLA structure with its epitope residues highlighted.
//!
//! Every atom receives an entry. `ATOM` records take the base color of the
//! [ColorPolicy](crate::styles::ColorPolicy); on the polymorphic chain of the molecule, residues of the
//! displayed epitopes are then recolored, monoclonal-antibody positions
//! winning over reactive-antibody positions, which win over plain epitope
//! positions. `HETATM` records are always drawn as sticks colored by element.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use hla3d_core::PolymorphicChain;
use hla3d_epitope::{PolymorphicResidue, ProfileResidues};
use hla3d_structure::{Atom, StructureRecord};

use crate::error::Result;
use crate::styles::{
    DEFAULT_ATOM_COLOR, EPITOPE_COLOR, MONOCLONAL_ANTIBODY_COLOR, REACTIVE_ANTIBODY_COLOR,
    StyleEntry, StyleOptions, VisualizationType, atom_color, three_to_one,
};

///
/// Which antibody-recognized epitope categories get their own color.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AntibodyFlags {
    pub reactive: bool,
    pub monoclonal: bool,
}

///
/// Epitope positions to highlight on one chain of a structure.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesaInfo {
    /// Chain carrying the polymorphic residues; `None` disables every override
    pub chain: Option<PolymorphicChain>,
    /// Epitope-defining positions and their expected one-letter amino acid
    pub desa: BTreeMap<i32, char>,
    pub desa_reactive: BTreeSet<i32>,
    pub desa_monoclonal: BTreeSet<i32>,
}

impl DesaInfo {
    ///
    /// Collect the positions of a profile; antibody categories not enabled
    /// in `flags` stay empty.
    ///
    pub fn new(
        chain: Option<PolymorphicChain>,
        residues: &ProfileResidues,
        flags: AntibodyFlags,
    ) -> Self {
        let positions = |r: &[PolymorphicResidue]| -> BTreeSet<i32> {
            r.iter().map(|p| p.position).collect()
        };
        DesaInfo {
            chain,
            desa: residues
                .desa
                .iter()
                .map(|r| (r.position, r.amino_acid))
                .collect(),
            desa_reactive: if flags.reactive {
                positions(residues.desa_reactive.as_slice())
            } else {
                BTreeSet::new()
            },
            desa_monoclonal: if flags.monoclonal {
                positions(residues.desa_monoclonal.as_slice())
            } else {
                BTreeSet::new()
            },
        }
    }

    fn targets(&self, atom: &Atom) -> bool {
        self.chain.is_some_and(|c| c.as_str() == atom.chain)
    }

    fn override_color(&self, atom: &Atom) -> Option<&'static str> {
        if !self.targets(atom) {
            return None;
        }
        let seq = atom.residue_seq;
        if self.desa_monoclonal.contains(&seq) {
            Some(MONOCLONAL_ANTIBODY_COLOR)
        } else if self.desa_reactive.contains(&seq) {
            Some(REACTIVE_ANTIBODY_COLOR)
        } else if self.desa.contains_key(&seq) {
            Some(EPITOPE_COLOR)
        } else {
            None
        }
    }
}

///
/// An epitope residue whose amino acid differs from the structure's residue.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueMismatch {
    pub chain: String,
    pub position: i32,
    pub expected: char,
    pub observed: String,
}

///
/// Style of every atom of a structure keyed by atom index, serialized as the
/// viewer's style object.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidueAnnotation(BTreeMap<usize, StyleEntry>);

impl ResidueAnnotation {
    pub fn get(&self, atom_index: usize) -> Option<&StyleEntry> {
        self.0.get(&atom_index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &StyleEntry)> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResidueAnnotationBuilder {
    options: StyleOptions,
}

impl ResidueAnnotationBuilder {
    pub fn new(options: StyleOptions) -> Self {
        ResidueAnnotationBuilder { options }
    }

    fn base_style(&self, atom: &Atom) -> StyleEntry {
        if atom.is_hetero() {
            let color = atom_color(&atom.element).unwrap_or(DEFAULT_ATOM_COLOR);
            return StyleEntry::new(color, VisualizationType::Stick);
        }
        StyleEntry::new(
            self.options.color_by.base_color(atom),
            self.options.visualization_type,
        )
    }

    ///
    /// Style every atom of a structure.
    ///
    /// Residue mismatches are logged once per position and never abort the annotation.
    ///
    /// # Arguments
    /// - structure: the parsed structure
    /// - desa: epitope positions to highlight
    pub fn annotate(&self, structure: &StructureRecord, desa: &DesaInfo) -> ResidueAnnotation {
        for mismatch in self.check_residues(structure, desa) {
            log::warn!(
                "In {}, chain {}: expected {}{}, found {}{}",
                structure.source_name(),
                mismatch.chain,
                mismatch.position,
                mismatch.expected,
                mismatch.position,
                mismatch.observed
            );
        }

        let styles = structure
            .atoms
            .iter()
            .map(|atom| {
                let style = match atom.is_hetero() {
                    true => self.base_style(atom),
                    false => match desa.override_color(atom) {
                        Some(color) => StyleEntry::new(color, self.options.visualization_type),
                        None => self.base_style(atom),
                    },
                };
                (atom.index, style)
            })
            .collect();

        ResidueAnnotation(styles)
    }

    ///
    /// Compare every epitope position present on the target chain with the
    /// residue found in the structure. Reports each position at most once.
    ///
    pub fn check_residues(
        &self,
        structure: &StructureRecord,
        desa: &DesaInfo,
    ) -> Vec<ResidueMismatch> {
        let mut seen: BTreeSet<i32> = BTreeSet::new();
        let mut mismatches = Vec::new();

        for atom in structure.atoms.iter().filter(|a| !a.is_hetero()) {
            if !desa.targets(atom) {
                continue;
            }
            let Some(&expected) = desa.desa.get(&atom.residue_seq) else {
                continue;
            };
            if !seen.insert(atom.residue_seq) {
                continue;
            }
            let observed = three_to_one(&atom.residue_name);
            if observed != Some(expected) {
                mismatches.push(ResidueMismatch {
                    chain: atom.chain.clone(),
                    position: atom.residue_seq,
                    expected,
                    observed: observed
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| atom.residue_name.clone()),
                });
            }
        }

        mismatches
    }
}
