pub mod app;
pub mod commands;
pub mod output;

pub use app::{Cli, Commands};

use anyhow::{Context, Result};
use log::debug;

use crate::api::GoogleClient;
use crate::auth::{self, Credentials};
use crate::config::Config;

/// Run one parsed command line to completion
pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match &cli.env_file {
        Some(path) => auth::load_env_file(path)?,
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                debug!("Loaded environment from {:?}", path);
            }
        }
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Auth(auth) => commands::handle_auth_command(auth.command).await,
        Commands::Forms(forms) => commands::handle_forms_command(forms.command, &config).await,
        Commands::Sheets(sheets) => commands::handle_sheets_command(sheets.command, &config).await,
        Commands::Settings(settings) => commands::handle_settings_command(settings.command).await,
    }
}

/// A client holding a fresh access token for the resolved credentials
pub(crate) async fn authenticated_client(config: &Config) -> Result<GoogleClient> {
    let credentials = Credentials::resolve(config)
        .context("Run 'gforms auth setup' to configure credentials")?;
    auth::connect(&credentials)
        .await
        .context("Failed to obtain an access token")
}
