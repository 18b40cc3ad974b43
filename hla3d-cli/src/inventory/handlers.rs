use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use hla3d_structure::get_inventory_hlas;

use crate::shared::{load_config, write_json};

///
/// Root of the structural inventory, from `--structure-dir` or the configuration.
///
pub fn structure_dir(matches: &ArgMatches) -> Result<PathBuf> {
    if let Some(dir) = matches.get_one::<String>("structure-dir") {
        return Ok(PathBuf::from(dir));
    }
    if matches.get_one::<String>("config").is_some() {
        return Ok(load_config(matches)?.structure_dir);
    }
    anyhow::bail!("Either --config or --structure-dir is required.")
}

pub fn run_inventory(matches: &ArgMatches) -> Result<()> {
    let dir = structure_dir(matches)?;
    let inventory = get_inventory_hlas(&dir)
        .with_context(|| format!("Failed to list the structures under {}", dir.display()))?;

    let total: usize = inventory.values().map(|alleles| alleles.len()).sum();
    log::info!("{} alleles over {} loci", total, inventory.len());

    write_json(&inventory, matches)
}
