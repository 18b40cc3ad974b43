use std::collections::BTreeSet;

use anyhow::{Context, Result};
use clap::ArgMatches;

use hla3d_epitope::{AlleleField, MinimumHlaCover};
use hla3d_vis::ReferenceBundle;

use crate::shared::{cover_options, load_config, write_json};

pub fn run_cover(matches: &ArgMatches) -> Result<()> {
    let targets: BTreeSet<String> = matches
        .get_many::<String>("epitopes")
        .context("At least one epitope is required.")?
        .map(|e| e.trim().to_string())
        .collect();

    let config = load_config(matches)?;
    let mut options = cover_options(matches, &config);
    if matches.get_flag("all") {
        options.allele_field = AlleleField::All;
    }
    let bundle = ReferenceBundle::load(&config)?;

    let cover = MinimumHlaCover::new(&bundle.epitopes)
        .with_structures(&bundle.locator)
        .cover(&targets, &options);

    log::info!(
        "Selected {} alleles, {} epitopes left unassigned",
        cover.assignments.len(),
        cover.unassigned.len()
    );

    write_json(&cover, matches)
}
