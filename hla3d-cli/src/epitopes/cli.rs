use clap::{Arg, Command};

use crate::shared::{config_arg, cover_args, output_arg, style_args};

pub const EPITOPES_CMD: &str = "epitopes";

pub fn create_epitopes_cli() -> Command {
    Command::new(EPITOPES_CMD)
        .author("hla3d")
        .about("Visualise epitopes on the fewest HLA molecules that carry them")
        .arg_required_else_help(true)
        .arg(config_arg())
        .arg(output_arg())
        .args(style_args())
        .args(cover_args())
        .arg(
            Arg::new("epitopes")
                .value_name("epitope")
                .num_args(1..)
                .required(true)
                .help("Epitope identifiers, e.g. 62QE 44RME"),
        )
}
