//! OAuth credential commands

pub mod handler;

use clap::{Args, Subcommand};
use std::path::PathBuf;

pub use handler::handle_auth_command;

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Check that credentials are present and can obtain an access token
    Check,
    /// Configure OAuth credentials and save them to a .env file
    Setup {
        /// OAuth client ID
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret
        #[arg(long)]
        client_secret: Option<String>,
        /// Refresh token obtained for the scopes the tool needs
        #[arg(long)]
        refresh_token: Option<String>,
        /// Where to write the .env file
        #[arg(long, default_value = ".env")]
        path: PathBuf,
        /// Store the credentials in the config file instead of a .env file
        #[arg(long)]
        global: bool,
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        yes: bool,
    },
}
