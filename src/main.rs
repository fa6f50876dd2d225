use clap::Parser;
use colored::*;
use log::{error, info};
use std::process::ExitCode;

use gforms_cli::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logger to file (truncate on each run)
    match std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("gforms.log")
    {
        Ok(log_file) => env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init(),
        Err(err) => eprintln!("{} could not open gforms.log: {}", "Warning:".yellow(), err),
    }

    let cli = Cli::parse();
    info!("Starting gforms");

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
