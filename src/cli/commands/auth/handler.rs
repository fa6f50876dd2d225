//! Credential check and setup wizard

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use log::info;
use std::fs;
use std::path::Path;

use super::AuthSubcommands;
use crate::api::constants::scopes;
use crate::auth::{Credentials, credential_presence, refresh_access_token};
use crate::config::Config;

pub async fn handle_auth_command(command: AuthSubcommands) -> Result<()> {
    match command {
        AuthSubcommands::Check => check_command().await,
        AuthSubcommands::Setup {
            client_id,
            client_secret,
            refresh_token,
            path,
            global,
            yes,
        } => {
            let credentials = prompt_credentials(client_id, client_secret, refresh_token)?;
            setup_command(credentials, &path, global, yes).await
        }
    }
}

async fn check_command() -> Result<()> {
    println!("{}", "Checking OAuth credentials...".bold());
    println!();

    let presence = credential_presence();
    for (name, present) in &presence {
        if *present {
            println!("  {} {} is set", "✓".bright_green().bold(), name);
        } else {
            println!("  {} {} is missing", "✗".bright_red().bold(), name);
        }
    }

    let config = Config::load()?;
    let credentials = match Credentials::resolve(&config) {
        Ok(credentials) => credentials,
        Err(err) => {
            println!();
            println!("{}", "Some credentials are missing.".bright_yellow());
            return Err(err.into());
        }
    };
    if presence.iter().any(|(_, present)| !present) {
        println!("  {} Using credentials stored in the config file", "ℹ".bright_blue());
    }

    println!();
    println!("{}", "Testing authentication...".bold());
    match refresh_access_token(&credentials).await {
        Ok(token) => {
            println!("{} Authentication successful", "✓".bright_green().bold());
            println!("  Token expires: {}", token.expires_at.to_rfc3339());
            Ok(())
        }
        Err(err) => {
            println!("{} Authentication failed", "✗".bright_red().bold());
            println!("  Your refresh token may be invalid or expired.");
            println!("  Run 'gforms auth setup' to get new credentials.");
            Err(err).context("Authentication failed")
        }
    }
}

fn print_setup_instructions() {
    println!("{}", "Google Forms CLI - OAuth setup".bright_blue().bold());
    println!();
    println!("Before you begin:");
    println!("  1. Create or select a project in the Google Cloud Console");
    println!("  2. Enable the Google Forms, Google Drive and Google Sheets APIs");
    println!("  3. Create an OAuth 2.0 Client ID (Desktop application)");
    println!("  4. In the OAuth Playground, use your own client and authorize these scopes:");
    for scope in scopes::ALL {
        println!("       {}", scope.cyan());
    }
    println!("  5. Exchange the authorization code and copy the refresh_token");
    println!();
}

fn prompt_credentials(
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
) -> Result<Credentials> {
    if client_id.is_none() || client_secret.is_none() || refresh_token.is_none() {
        print_setup_instructions();
    }

    let client_id = match client_id {
        Some(id) => id,
        None => Input::<String>::new()
            .with_prompt("Client ID")
            .interact_text()?,
    };

    let client_secret = match client_secret {
        Some(secret) => secret,
        None => Password::new().with_prompt("Client secret").interact()?,
    };

    let refresh_token = match refresh_token {
        Some(token) => token,
        None => Password::new().with_prompt("Refresh token").interact()?,
    };

    let credentials = Credentials {
        client_id: client_id.trim().to_string(),
        client_secret: client_secret.trim().to_string(),
        refresh_token: refresh_token.trim().to_string(),
    };
    if credentials.client_id.is_empty()
        || credentials.client_secret.is_empty()
        || credentials.refresh_token.is_empty()
    {
        anyhow::bail!("Client ID, client secret and refresh token are all required");
    }
    Ok(credentials)
}

async fn setup_command(credentials: Credentials, path: &Path, global: bool, yes: bool) -> Result<()> {
    println!();
    println!("{}", "Testing credentials...".bold());
    let token = refresh_access_token(&credentials)
        .await
        .context("The credentials could not obtain an access token; nothing was saved")?;
    println!(
        "{} Authentication successful (token valid until {})",
        "✓".bright_green().bold(),
        token.expires_at.to_rfc3339()
    );

    if global {
        let mut config = Config::load()?;
        config.set_credentials(credentials.into())?;
        println!(
            "{} Credentials saved to {}",
            "✓".bright_green().bold(),
            Config::get_config_path()?.display()
        );
        return Ok(());
    }

    if path.exists()
        && !yes
        && !Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?
    {
        println!("Cancelled. Credentials not saved.");
        return Ok(());
    }

    credentials
        .write_env_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote credentials to {:?}", path);
    println!("{} Credentials saved to {}", "✓".bright_green().bold(), path.display());

    if ensure_gitignored(path)? {
        println!("{} Added {} to .gitignore", "✓".bright_green().bold(), path.display());
    }
    Ok(())
}

/// Make sure the credentials file is listed in the .gitignore next to it
fn ensure_gitignored(env_path: &Path) -> Result<bool> {
    let Some(file_name) = env_path.file_name().and_then(|name| name.to_str()) else {
        return Ok(false);
    };
    let gitignore = env_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(".gitignore");

    let existing = if gitignore.exists() {
        fs::read_to_string(&gitignore)
            .with_context(|| format!("Failed to read {}", gitignore.display()))?
    } else {
        String::new()
    };
    if existing.lines().any(|line| line.trim() == file_name) {
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&format!("# OAuth credentials\n{}\n", file_name));
    fs::write(&gitignore, updated)
        .with_context(|| format!("Failed to write {}", gitignore.display()))?;
    Ok(true)
}
