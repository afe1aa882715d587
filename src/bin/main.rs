use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use commonroad_pb_converter::{cli::Args, convert_file, initialize_tracing};

fn main() -> ExitCode {
    let args = Args::parse();
    initialize_tracing();

    match convert_file(&args.path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
