//! Read-only spreadsheet commands

pub mod handler;

use clap::{Args, Subcommand};
use std::path::PathBuf;

pub use handler::handle_sheets_command;

#[derive(Args)]
pub struct SheetsCommands {
    #[command(subcommand)]
    pub command: SheetsSubcommands,
}

#[derive(Subcommand)]
pub enum SheetsSubcommands {
    /// Show spreadsheet title, locale and sheets
    Info {
        /// Spreadsheet ID or URL
        spreadsheet: String,
    },
    /// List the sheets (tabs) of a spreadsheet
    List {
        /// Spreadsheet ID or URL
        spreadsheet: String,
    },
    /// Print cell values
    Read {
        /// Spreadsheet ID or URL
        spreadsheet: String,
        /// Sheet (tab) name
        #[arg(short, long)]
        sheet: Option<String>,
        /// Cell range in A1 notation, e.g. A1:D10
        #[arg(short, long)]
        range: Option<String>,
        /// Read several full A1 ranges in one call; may be repeated
        #[arg(long = "batch", value_name = "RANGE", conflicts_with_all = ["sheet", "range"])]
        batch: Vec<String>,
        /// Print values as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export cell values to CSV
    Export {
        /// Spreadsheet ID or URL
        spreadsheet: String,
        #[arg(short, long)]
        sheet: Option<String>,
        #[arg(short, long)]
        range: Option<String>,
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
