use clap::{Arg, Command, arg};

use crate::shared::{config_arg, cover_args, output_arg};

pub const COVER_CMD: &str = "cover";

pub fn create_cover_cli() -> Command {
    Command::new(COVER_CMD)
        .author("hla3d")
        .about("Select the HLA alleles that display a set of epitopes, without rendering")
        .arg_required_else_help(true)
        .arg(config_arg())
        .arg(output_arg())
        .args(cover_args())
        .arg(arg!(--all "Use the all-alleles field of the epitope table instead of Luminex alleles"))
        .arg(
            Arg::new("epitopes")
                .value_name("epitope")
                .num_args(1..)
                .required(true)
                .help("Epitope identifiers, e.g. 62QE 44RME"),
        )
}
