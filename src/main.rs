//! Provides the main entry point to the program.
use fleetreport::cli::run_cli;
use human_panic::setup_panic;
use std::process::ExitCode;

fn main() -> ExitCode {
    setup_panic!();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
