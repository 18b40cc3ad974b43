use clap::{Arg, Command};

use crate::shared::{config_arg, output_arg, style_args};

pub const TRANSPLANTS_CMD: &str = "transplants";

pub fn create_transplants_cli() -> Command {
    Command::new(TRANSPLANTS_CMD)
        .author("hla3d")
        .about("Visualise the donor-specific epitopes of transplants on the donor HLA molecules")
        .arg_required_else_help(true)
        .arg(config_arg())
        .arg(output_arg())
        .args(style_args())
        .arg(
            Arg::new("transplants")
                .value_name("transplant_id")
                .num_args(1..)
                .required(true)
                .help("Transplant identifiers of the DESA table"),
        )
}
