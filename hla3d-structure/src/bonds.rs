//! Covalent bond inference from atom coordinates.
//!
//! Two atoms of the same chain are bonded when their distance lies between
//! [MIN_BOND_DISTANCE] and the sum of their covalent radii plus [BOND_TOLERANCE].
//! Candidate pairs come from a uniform grid so that only neighbouring cells are compared.
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::parser::Atom;

/// Slack added to the sum of covalent radii, in angstroms.
pub const BOND_TOLERANCE: f64 = 0.45;
/// Pairs closer than this are overlapping atoms, not bonds.
pub const MIN_BOND_DISTANCE: f64 = 0.4;
/// Radius used for elements missing from the table.
pub const DEFAULT_COVALENT_RADIUS: f64 = 0.77;

///
/// A bond between two atoms, stored with the lower atom index first.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub atom1_index: usize,
    pub atom2_index: usize,
}

impl Bond {
    pub fn new(first: usize, second: usize) -> Self {
        let (atom1_index, atom2_index) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        Bond {
            atom1_index,
            atom2_index,
        }
    }
}

/// Single-bond covalent radius of an element symbol, in angstroms.
pub fn covalent_radius(element: &str) -> f64 {
    match element.to_ascii_uppercase().as_str() {
        "H" => 0.31,
        "C" => 0.76,
        "N" => 0.71,
        "O" => 0.66,
        "S" => 1.05,
        "P" => 1.07,
        "SE" => 1.20,
        "F" => 0.57,
        "CL" => 1.02,
        "BR" => 1.20,
        "I" => 1.39,
        "FE" => 1.32,
        "ZN" => 1.22,
        "MG" => 1.41,
        "CA" => 1.76,
        "NA" => 1.66,
        "K" => 2.03,
        "MN" => 1.39,
        "CU" => 1.32,
        _ => DEFAULT_COVALENT_RADIUS,
    }
}

type Cell = (i64, i64, i64);

fn cell_of(position: &[f64; 3], cell_size: f64) -> Cell {
    (
        (position[0] / cell_size).floor() as i64,
        (position[1] / cell_size).floor() as i64,
        (position[2] / cell_size).floor() as i64,
    )
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

///
/// Infer the covalent bonds of a list of atoms.
///
/// The result is sorted and free of duplicates, so identical atom lists always
/// produce identical bond lists.
///
pub fn infer_bonds(atoms: &[Atom]) -> Vec<Bond> {
    if atoms.len() < 2 {
        return Vec::new();
    }

    let radii: Vec<f64> = atoms.iter().map(|a| covalent_radius(&a.element)).collect();
    let max_radius = radii.iter().cloned().fold(0.0_f64, f64::max);
    // no bond can be longer than one cell
    let cell_size = 2.0 * max_radius + BOND_TOLERANCE;

    let mut grid: FxHashMap<Cell, Vec<usize>> = FxHashMap::default();
    for (i, atom) in atoms.iter().enumerate() {
        grid.entry(cell_of(&atom.position, cell_size))
            .or_default()
            .push(i);
    }

    let mut bonds: Vec<Bond> = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        let (cx, cy, cz) = cell_of(&atom.position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let (Some(x), Some(y), Some(z)) =
                        (cx.checked_add(dx), cy.checked_add(dy), cz.checked_add(dz))
                    else {
                        continue;
                    };
                    let cell = (x, y, z);
                    let Some(neighbours) = grid.get(&cell) else {
                        continue;
                    };
                    for &j in neighbours {
                        if j <= i || atoms[j].chain != atom.chain {
                            continue;
                        }
                        let d = distance(&atom.position, &atoms[j].position);
                        if d >= MIN_BOND_DISTANCE && d <= radii[i] + radii[j] + BOND_TOLERANCE {
                            bonds.push(Bond::new(i, j));
                        }
                    }
                }
            }
        }
    }

    bonds.sort();
    bonds.dedup();
    bonds
}
