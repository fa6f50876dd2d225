use super::commands::{AuthCommands, FormsCommands, SettingsCommands, SheetsCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gforms")]
#[command(version)]
#[command(about = "A CLI tool for creating, duplicating and exporting Google Forms")]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Load credentials from this .env file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OAuth credential setup and verification
    Auth(AuthCommands),
    /// Create, duplicate, personalize and export forms
    Forms(FormsCommands),
    /// Read data from Google Sheets
    Sheets(SheetsCommands),
    /// Application settings management
    Settings(SettingsCommands),
}
