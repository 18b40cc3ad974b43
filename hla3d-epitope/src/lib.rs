//! Epitope reference data and the selection of HLA molecules to display them on.
//!
//! This crate holds the epitope table ([EpitopeRepository]), the greedy minimum HLA
//! cover that picks which alleles display a set of epitopes ([MinimumHlaCover]), and the
//! donor-specific epitope profiles of transplants ([DesaRepository]).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use hla3d_epitope::{CoverOptions, ElliProScore, Epitope, EpitopeRepository, MinimumHlaCover};
//!
//! let epitope = |id: &str, alleles: &[&str]| Epitope {
//!     id: id.to_string(),
//!     polymorphic_residues: vec![(62, 'E').into()],
//!     luminex_alleles: alleles.iter().map(|a| a.to_string()).collect(),
//!     all_alleles: BTreeSet::new(),
//!     antibody_reactivity: false,
//!     monoclonal: false,
//!     isotype: None,
//!     ellipro_score: ElliProScore::High,
//! };
//!
//! let repository = EpitopeRepository::new(vec![
//!     epitope("62EE", &["A*24:02"]),
//!     epitope("114Q", &["A*24:02", "B*07:02"]),
//!     epitope("105S", &["B*07:02"]),
//! ]).unwrap();
//!
//! let targets: BTreeSet<String> = repository.ids();
//! let options = CoverOptions { restrict_to_known_structures: false, ..Default::default() };
//! let cover = MinimumHlaCover::new(&repository).cover(&targets, &options);
//!
//! assert_eq!(cover.alleles(), vec!["A*24:02", "B*07:02"]);
//! assert_eq!(cover.covered(), targets);
//! ```
pub mod cover;
pub mod desa;
pub mod error;
pub mod models;
pub mod profile;
pub mod repository;

pub use cover::*;
pub use desa::*;
pub use error::*;
pub use models::*;
pub use profile::*;
pub use repository::*;
