use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, arg, value_parser};
use serde::Serialize;

use hla3d_epitope::{CoverOptions, ElliProScore};
use hla3d_vis::{AntibodyFlags, Hla3dConfig, StyleOptions, VisOptions};

pub fn config_arg() -> Arg {
    arg!(-c --config <config> "Path to the hla3d TOML configuration")
}

pub fn output_arg() -> Arg {
    arg!(-o --output <output> "Write the JSON result to this file instead of stdout")
        .required(false)
}

pub fn style_args() -> Vec<Arg> {
    vec![
        arg!(-s --style <style> "Visualization type: sphere, stick or cartoon").required(false),
        Arg::new("color_by")
            .long("color-by")
            .value_name("policy")
            .help("Base coloring: chain, residue, residue_type or atom"),
        arg!(--reactive "Highlight epitopes recognized by reactive antibodies"),
        arg!(--monoclonal "Highlight epitopes recognized by monoclonal antibodies"),
        Arg::new("exposure")
            .long("exposure")
            .value_name("scores")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .help("Keep only epitopes with these ElliPro scores, e.g. High,Intermediate"),
    ]
}

pub fn cover_args() -> Vec<Arg> {
    vec![
        Arg::new("exclude")
            .long("exclude")
            .value_name("alleles")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .help("Alleles never used to display epitopes"),
        Arg::new("prefer")
            .long("prefer")
            .value_name("alleles")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .help("Draw display alleles from these alleles only"),
        Arg::new("max_iterations")
            .long("max-iterations")
            .value_name("n")
            .value_parser(value_parser!(usize))
            .help("Upper bound on the number of selected alleles"),
        Arg::new("all_structures")
            .long("all-structures")
            .action(ArgAction::SetTrue)
            .help("Also select alleles without a structural file"),
    ]
}

pub fn load_config(matches: &ArgMatches) -> Result<Hla3dConfig> {
    let path = matches
        .get_one::<String>("config")
        .context("A path to a configuration file is required.")?;
    Hla3dConfig::try_from(Path::new(path))
        .with_context(|| format!("Failed to read the configuration {}", path))
}

// subcommands share these helpers without declaring every argument
fn strings(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    matches
        .try_get_many::<String>(id)
        .ok()
        .flatten()
        .map(|values| values.map(|v| v.trim().to_string()).collect())
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

///
/// Cover options of the configuration, overridden by command line flags.
///
pub fn cover_options(matches: &ArgMatches, config: &Hla3dConfig) -> CoverOptions {
    let mut options = config.cover.to_options();

    if let Some(exclude) = strings(matches, "exclude") {
        options.exclude.extend(exclude);
    }
    if let Some(prefer) = strings(matches, "prefer") {
        options.preference = Some(prefer.into_iter().collect());
    }
    if let Some(max_iterations) = matches.try_get_one::<usize>("max_iterations").ok().flatten() {
        options.max_iterations = *max_iterations;
    }
    if flag(matches, "all_structures") {
        options.restrict_to_known_structures = false;
    }

    options
}

pub fn style_options(matches: &ArgMatches, config: &Hla3dConfig) -> Result<StyleOptions> {
    let mut style = config.style;
    if let Some(value) = matches.get_one::<String>("style") {
        style.visualization_type = value.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(value) = matches.get_one::<String>("color_by") {
        style.color_by = value.parse().map_err(anyhow::Error::msg)?;
    }
    Ok(style)
}

pub fn exposure(matches: &ArgMatches) -> Result<Option<BTreeSet<ElliProScore>>> {
    let Some(values) = strings(matches, "exposure") else {
        return Ok(None);
    };
    let scores = values
        .iter()
        .map(|v| v.parse::<ElliProScore>().map_err(anyhow::Error::msg))
        .collect::<Result<BTreeSet<_>>>()?;
    Ok(Some(scores))
}

pub fn vis_options(matches: &ArgMatches, config: &Hla3dConfig) -> Result<VisOptions> {
    Ok(VisOptions {
        style: style_options(matches, config)?,
        antibodies: AntibodyFlags {
            reactive: flag(matches, "reactive"),
            monoclonal: flag(matches, "monoclonal"),
        },
        exposure: exposure(matches)?,
        cover: cover_options(matches, config),
    })
}

///
/// Serialize a result as JSON to `--output`, or to stdout when it is absent.
///
pub fn write_json<T: Serialize>(value: &T, matches: &ArgMatches) -> Result<()> {
    match matches.get_one::<String>("output") {
        Some(path) => {
            let file = File::create(PathBuf::from(path))
                .with_context(|| format!("Failed to create {}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, value)?;
            writer.flush()?;
            log::info!("Wrote {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
