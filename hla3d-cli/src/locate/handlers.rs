use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use hla3d_core::hla_to_filename;
use hla3d_structure::{StructureFileLocator, StructureLookup};

use crate::inventory::handlers::structure_dir;
use crate::shared::write_json;

#[derive(Debug, Serialize)]
struct Location {
    hla: String,
    locus: Option<String>,
    filename: Option<String>,
    path: Option<PathBuf>,
}

pub fn run_locate(matches: &ArgMatches) -> Result<()> {
    let locator = StructureFileLocator::new(structure_dir(matches)?);

    let locations = matches
        .get_many::<String>("alleles")
        .context("At least one allele is required.")?
        .map(|hla| {
            let path = locator.resolve(hla);
            if path.is_none() {
                log::warn!("No structure for {}", hla);
            }
            let (locus, filename) = match hla_to_filename(hla) {
                Ok((locus, filename)) => (Some(locus), Some(filename)),
                Err(e) => {
                    log::warn!("{}", e);
                    (None, None)
                }
            };
            Location {
                hla: hla.clone(),
                locus,
                filename,
                path,
            }
        })
        .collect::<Vec<_>>();

    write_json(&locations, matches)
}
