mod cover;
mod epitopes;
mod inventory;
mod locate;
mod shared;
mod transplants;

use anyhow::Result;
use clap::{Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "hla3d";
    pub const BIN_NAME: &str = "hla3d";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("hla3d")
        .about("3D visualisation of HLA epitopes and donor-specific antibody targets.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Log debug messages").global(true))
        .subcommand(epitopes::cli::create_epitopes_cli())
        .subcommand(transplants::cli::create_transplants_cli())
        .subcommand(cover::cli::create_cover_cli())
        .subcommand(inventory::cli::create_inventory_cli())
        .subcommand(locate::cli::create_locate_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::debug!("{} {}", consts::PKG_NAME, consts::VERSION);

    match matches.subcommand() {
        //
        // EPITOPES
        //
        Some((epitopes::cli::EPITOPES_CMD, matches)) => {
            epitopes::handlers::run_epitopes(matches)?;
        }

        //
        // TRANSPLANTS
        //
        Some((transplants::cli::TRANSPLANTS_CMD, matches)) => {
            transplants::handlers::run_transplants(matches)?;
        }

        //
        // COVER
        //
        Some((cover::cli::COVER_CMD, matches)) => {
            cover::handlers::run_cover(matches)?;
        }

        //
        // INVENTORY
        //
        Some((inventory::cli::INVENTORY_CMD, matches)) => {
            inventory::handlers::run_inventory(matches)?;
        }

        //
        // LOCATE
        //
        Some((locate::cli::LOCATE_CMD, matches)) => {
            locate::handlers::run_locate(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use hla3d_epitope::ElliProScore;
    use hla3d_vis::{ColorPolicy, VisualizationType};
    use pretty_assertions::assert_eq;
    use rstest::*;

    const CONFIG: &str = "../tests/data/hla3d.toml";

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_epitopes_options_override_config() {
        let matches = build_parser()
            .try_get_matches_from([
                "hla3d",
                "epitopes",
                "-c",
                CONFIG,
                "--style",
                "stick",
                "--color-by",
                "residue-type",
                "--exposure",
                "High,Intermediate",
                "--exclude",
                "A*11:01",
                "--max-iterations",
                "3",
                "--reactive",
                "62QE",
                "44RME",
            ])
            .unwrap();
        let (_, matches) = matches.subcommand().unwrap();

        let config = shared::load_config(matches).unwrap();
        let options = shared::vis_options(matches, &config).unwrap();

        assert_eq!(options.style.visualization_type, VisualizationType::Stick);
        assert_eq!(options.style.color_by, ColorPolicy::ResidueType);
        assert_eq!(
            options.exposure.unwrap().into_iter().collect::<Vec<_>>(),
            vec![ElliProScore::Intermediate, ElliProScore::High]
        );
        assert!(options.cover.exclude.contains("A*11:01"));
        assert_eq!(options.cover.max_iterations, 3);
        assert!(options.antibodies.reactive);
        assert!(!options.antibodies.monoclonal);
        assert_eq!(
            matches.get_many::<String>("epitopes").unwrap().count(),
            2
        );
    }

    #[rstest]
    fn test_invalid_style_is_rejected() {
        let matches = build_parser()
            .try_get_matches_from(["hla3d", "epitopes", "-c", CONFIG, "-s", "ribbon", "62QE"])
            .unwrap();
        let (_, matches) = matches.subcommand().unwrap();
        let config = shared::load_config(matches).unwrap();

        assert!(shared::vis_options(matches, &config).is_err());
    }

    #[rstest]
    fn test_transplants_options_without_cover_flags() {
        let matches = build_parser()
            .try_get_matches_from(["hla3d", "transplants", "-c", CONFIG, "--monoclonal", "1402"])
            .unwrap();
        let (_, matches) = matches.subcommand().unwrap();
        let config = shared::load_config(matches).unwrap();

        let options = shared::vis_options(matches, &config).unwrap();
        assert!(options.antibodies.monoclonal);
        assert_eq!(options.cover, config.cover.to_options());
    }

    #[rstest]
    fn test_transplants_requires_ids() {
        let result = build_parser().try_get_matches_from(["hla3d", "transplants", "-c", CONFIG]);
        assert!(result.is_err());
    }

    #[rstest]
    fn test_inventory_structure_dir() {
        let matches = build_parser()
            .try_get_matches_from(["hla3d", "inventory", "-c", CONFIG])
            .unwrap();
        let (_, matches) = matches.subcommand().unwrap();

        let dir = inventory::handlers::structure_dir(matches).unwrap();
        assert!(dir.ends_with("structures"));
    }
}
