//! # hla3d-core
//!
//! Shared building blocks for the hla3d crates.
//!
//! HLA alleles are never stored as objects. Every derived property (locus,
//! immunological class, polymorphic chain, structural file name) is a pure
//! function of the allele identifier string, so the mapping stays trivially
//! testable:
//!
//! ```rust
//! use hla3d_core::models::{get_hla_class, get_hla_locus, get_hla_polychain, HlaClass, PolymorphicChain};
//!
//! assert_eq!(get_hla_locus("DRB3*01:01"), "DRB");
//! assert_eq!(get_hla_class("B*57:01"), HlaClass::I);
//! assert_eq!(get_hla_polychain("DQB1*06:01"), Some(PolymorphicChain::B));
//! ```
//!
pub mod errors;
pub mod filenames;
pub mod models;
pub mod utils;

pub use errors::*;
pub use filenames::*;
pub use models::*;
pub use utils::flatten_dict_values;

pub mod consts {
    /// Marker placed between the allele stem and the file extension of curated structures.
    pub const STRUCTURE_FILE_MARKER: &str = "_V1";
    pub const STRUCTURE_FILE_EXT: &str = "pdb";
    /// Separator between the two chains of heterodimer structure files (`DQA1_.._DQB1_.._V1.pdb`).
    pub const HETERODIMER_SEPARATOR: char = '-';
}
