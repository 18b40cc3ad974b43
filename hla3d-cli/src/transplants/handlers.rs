use anyhow::{Context, Result};
use clap::ArgMatches;

use hla3d_vis::{ReferenceBundle, VisualizationOrchestrator, parse_transplant_ids};

use crate::shared::{load_config, vis_options, write_json};

pub fn run_transplants(matches: &ArgMatches) -> Result<()> {
    let values: Vec<&String> = matches
        .get_many::<String>("transplants")
        .context("At least one transplant id is required.")?
        .collect();
    let ids = parse_transplant_ids(values.as_slice())?;

    let config = load_config(matches)?;
    let options = vis_options(matches, &config)?;
    let bundle = ReferenceBundle::load(&config)?;

    let payload = VisualizationOrchestrator::new(&bundle).from_transplants(&ids, &options)?;
    log::info!("Visualised {} transplants", payload.transplants.len());

    write_json(&payload, matches)
}
