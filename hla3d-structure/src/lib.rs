//! # Structural files of HLA molecules.
//!
//! This crate locates the curated structure of an HLA allele in the on-disk inventory,
//! parses the fixed-width coordinate file into a [StructureRecord] (atoms plus inferred
//! bonds), and turns that record into the model payload consumed by the 3D molecule viewer.
//!
pub mod bonds;
pub mod error;
pub mod locator;
pub mod model;
pub mod parser;

// re-expose core functions
pub use bonds::*;
pub use error::*;
pub use locator::*;
pub use model::*;
pub use parser::*;
