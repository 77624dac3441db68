//! Main application entry point.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting BotPilot");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    match botpilot_app::run(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("botpilot: {e}");
            ExitCode::FAILURE
        }
    }
}
