use clap::{Arg, Command, arg};

use crate::shared::output_arg;

pub const LOCATE_CMD: &str = "locate";

pub fn create_locate_cli() -> Command {
    Command::new(LOCATE_CMD)
        .author("hla3d")
        .about("Find the structural file of HLA alleles")
        .arg_required_else_help(true)
        .arg(arg!(-c --config <config> "Path to the hla3d TOML configuration").required(false))
        .arg(arg!(-d --"structure-dir" <dir> "Root of the structural inventory").required(false))
        .arg(output_arg())
        .arg(
            Arg::new("alleles")
                .value_name("allele")
                .num_args(1..)
                .required(true)
                .help("HLA alleles, e.g. A*11:01 DQB1*06:01"),
        )
}
