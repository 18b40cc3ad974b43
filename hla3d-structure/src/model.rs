use serde::{Deserialize, Serialize};

use crate::bonds::Bond;
use crate::error::Result;
use crate::parser::{Atom, StructureRecord};

///
/// Atom as consumed by the 3D molecule viewer.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAtom {
    pub name: String,
    pub chain: String,
    pub positions: [f64; 3],
    pub residue_index: usize,
    pub element: String,
    /// Residue name followed by its sequence number, e.g. `GLU62`
    pub residue_name: String,
    /// Index of the atom in the structure
    pub serial: usize,
}

impl From<&Atom> for ModelAtom {
    fn from(atom: &Atom) -> Self {
        ModelAtom {
            name: atom.name.clone(),
            chain: atom.chain.clone(),
            positions: atom.position,
            residue_index: atom.residue_index,
            element: atom.element.clone(),
            residue_name: format!("{}{}", atom.residue_name, atom.residue_seq),
            serial: atom.index,
        }
    }
}

///
/// Structural model payload: atoms and bonds in the viewer's exchange format.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub atoms: Vec<ModelAtom>,
    pub bonds: Vec<Bond>,
}

impl From<&StructureRecord> for ModelData {
    fn from(record: &StructureRecord) -> Self {
        ModelData {
            atoms: record.atoms.iter().map(ModelAtom::from).collect(),
            bonds: record.bonds.clone(),
        }
    }
}

impl ModelData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
