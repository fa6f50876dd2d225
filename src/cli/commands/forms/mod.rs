//! Form management, duplication and export commands

pub mod handler;

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::forms::personalize::parse_replacement;
use crate::forms::{QuestionType, parse_question_type};

pub use handler::handle_forms_command;

#[derive(Args)]
pub struct FormsCommands {
    #[command(subcommand)]
    pub command: FormsSubcommands,
}

#[derive(Subcommand)]
pub enum FormsSubcommands {
    /// List your forms with their links and response counts
    List {
        /// Forms per page (defaults to the list-page-size setting)
        #[arg(long)]
        page_size: Option<u32>,
        /// Continue from a previous listing
        #[arg(long)]
        page_token: Option<String>,
    },
    /// Create an empty form
    Create {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show a form's structure
    Get {
        form_id: String,
        /// Print the raw form as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a form's title or description
    Update {
        form_id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a form
    Delete {
        form_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy a form's settings and items into a new form
    Duplicate {
        form_id: String,
        /// Title of the copy
        title: String,
        /// Maximum operations per batch call (defaults to the chunk-size setting)
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Create items one call at a time and continue past failures
        #[arg(long)]
        sequential: bool,
    },
    /// Replace placeholder text throughout a form
    Personalize {
        form_id: String,
        /// Value for every configured placeholder
        #[arg(short, long)]
        name: Option<String>,
        /// Extra PLACEHOLDER=value replacement; may be repeated
        #[arg(short, long = "replace", value_name = "PLACEHOLDER=VALUE", value_parser = parse_replacement)]
        replacements: Vec<(String, String)>,
    },
    /// Print a form's share and edit links
    Link { form_id: String },
    /// Add a question to a form
    AddQuestion {
        form_id: String,
        /// Question type, e.g. MULTIPLE_CHOICE or LINEAR_SCALE
        #[arg(short = 'T', long = "type", value_parser = parse_question_type, default_value = "SHORT_ANSWER")]
        question_type: QuestionType,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        required: bool,
        /// Choice option; may be repeated
        #[arg(long = "option", value_name = "TEXT")]
        options: Vec<String>,
        /// Lowest scale value
        #[arg(long)]
        low: Option<i32>,
        /// Highest scale or rating value
        #[arg(long)]
        high: Option<i32>,
        #[arg(long)]
        low_label: Option<String>,
        #[arg(long)]
        high_label: Option<String>,
        /// Grid row; may be repeated
        #[arg(long = "row", value_name = "TEXT")]
        rows: Vec<String>,
        /// Grid column; may be repeated
        #[arg(long = "column", value_name = "TEXT")]
        columns: Vec<String>,
        /// Drive folder receiving uploads
        #[arg(long)]
        folder_id: Option<String>,
        #[arg(long)]
        max_files: Option<i32>,
        /// Maximum upload size in bytes
        #[arg(long)]
        max_file_size: Option<i64>,
        /// Allowed upload type, e.g. PDF; may be repeated
        #[arg(long = "allowed-type", value_name = "TYPE")]
        allowed_types: Vec<String>,
        /// Ask for a time as well as a date
        #[arg(long)]
        include_time: bool,
        /// Leave the year out of a date question
        #[arg(long)]
        no_year: bool,
        /// Ask for an elapsed duration instead of a time of day
        #[arg(long)]
        duration: bool,
        /// Insert at this zero-based position instead of appending
        #[arg(short, long)]
        position: Option<usize>,
    },
    /// Change an existing question
    UpdateQuestion {
        form_id: String,
        item_id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        required: Option<bool>,
    },
    /// Remove a question
    DeleteQuestion {
        form_id: String,
        item_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a question to a new zero-based position
    MoveQuestion {
        form_id: String,
        item_id: String,
        position: usize,
    },
    /// Add a section break
    AddSection {
        form_id: String,
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        position: Option<usize>,
    },
    /// List submitted responses
    Responses {
        form_id: String,
        /// Show only this response
        #[arg(long)]
        response_id: Option<String>,
        /// Print raw responses as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export responses to CSV
    Export {
        form_id: String,
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leave out the timestamp column
        #[arg(long)]
        no_timestamps: bool,
        /// Leave out the respondent email column
        #[arg(long)]
        no_email: bool,
    },
    /// Create a form from a YAML template
    Apply { file: PathBuf },
    /// Write a form's questions as a YAML template
    ExportTemplate {
        form_id: String,
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
