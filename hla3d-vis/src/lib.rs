//! # hla3d-vis
//!
//! 3D visualisation payloads of epitopes on HLA molecules.
//!
//! ## Purpose
//!
//! This crate ties the epitope reference data of hla3d-epitope to the structural
//! files of hla3d-structure. For each HLA molecule selected to display a set of
//! epitopes, it produces the model (atoms and bonds) and the per-atom style consumed
//! by a 3D molecule viewer, with the epitope residues highlighted.
//!
//! ## Main Components
//!
//! - **`ReferenceBundle`**: epitope table, donor profiles and structural inventory, loaded once
//! - **`ResidueAnnotationBuilder`**: per-atom colors with epitope overrides
//! - **`VisualizationOrchestrator`**: the two entry points, from epitopes and from transplants
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//! use hla3d_vis::{Hla3dConfig, ReferenceBundle, VisOptions, VisualizationOrchestrator};
//!
//! let config = Hla3dConfig::try_from(Path::new("../tests/data/hla3d.toml")).unwrap();
//! let bundle = ReferenceBundle::load(&config).unwrap();
//!
//! let orchestrator = VisualizationOrchestrator::new(&bundle);
//! let payload = orchestrator
//!     .from_epitopes(&["62QE", "44RME"], &VisOptions::default())
//!     .unwrap();
//!
//! assert!(payload.structures.contains_key("A*11:01"));
//! assert!(payload.structures.contains_key("B*57:01"));
//! ```
//!
pub mod annotation;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod styles;

// re-export things
pub use annotation::*;
pub use bundle::*;
pub use cache::*;
pub use config::*;
pub use error::*;
pub use orchestrator::*;
pub use styles::*;
