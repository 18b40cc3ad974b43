use clap::{Command, arg};

use crate::shared::output_arg;

pub const INVENTORY_CMD: &str = "inventory";

pub fn create_inventory_cli() -> Command {
    Command::new(INVENTORY_CMD)
        .author("hla3d")
        .about("List the HLA alleles with a structural file, per locus")
        .arg_required_else_help(true)
        .arg(arg!(-c --config <config> "Path to the hla3d TOML configuration").required(false))
        .arg(arg!(-d --"structure-dir" <dir> "Root of the structural inventory").required(false))
        .arg(output_arg())
}
