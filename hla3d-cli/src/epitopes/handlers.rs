use anyhow::{Context, Result};
use clap::ArgMatches;

use hla3d_vis::{ReferenceBundle, VisualizationOrchestrator};

use crate::shared::{load_config, vis_options, write_json};

pub fn run_epitopes(matches: &ArgMatches) -> Result<()> {
    let epitopes: Vec<String> = matches
        .get_many::<String>("epitopes")
        .context("At least one epitope is required.")?
        .cloned()
        .collect();

    let config = load_config(matches)?;
    let options = vis_options(matches, &config)?;
    let bundle = ReferenceBundle::load(&config)?;

    let payload =
        VisualizationOrchestrator::new(&bundle).from_epitopes(epitopes.as_slice(), &options)?;

    log::info!(
        "Displayed {} alleles, {} without structure",
        payload.structures.len(),
        payload.missing_structures.len()
    );

    write_json(&payload, matches)
}
