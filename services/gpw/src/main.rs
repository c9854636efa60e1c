//! GPW COG and STAC command-line tool.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use gpw::commands;
use gpw::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = cli.log.init_tracing() {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    info!(command = ?cli.command, "Starting gpw");

    match commands::run(&cli).await {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
