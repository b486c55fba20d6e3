//! Main application entry point.

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let cli = inkpad_app::Cli::parse();
    log::debug!("Starting Inkpad: {:?}", cli.command);

    match inkpad_app::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
