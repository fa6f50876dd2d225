use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use dialoguer::Confirm;
use log::info;

use crate::config::{Config, SETTING_KEYS, Settings};

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show current settings
    Show,
    /// Get the value of a specific setting
    Get {
        /// Setting name
        name: String,
    },
    /// Set the value of a specific setting
    Set {
        /// Setting name
        name: String,
        /// Setting value
        value: String,
    },
    /// Reset a setting to its default value
    Reset {
        /// Setting name
        name: String,
    },
    /// Reset all settings to default values
    ResetAll {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_settings_command(command: SettingsSubcommands) -> Result<()> {
    match command {
        SettingsSubcommands::Show => show_command(),
        SettingsSubcommands::Get { name } => get_command(&name),
        SettingsSubcommands::Set { name, value } => set_command(&name, &value),
        SettingsSubcommands::Reset { name } => reset_command(&name),
        SettingsSubcommands::ResetAll { force } => reset_all_command(force),
    }
}

fn print_settings(settings: &Settings) -> Result<()> {
    for key in SETTING_KEYS {
        println!("  {}: {}", key.cyan(), settings.get(key)?);
    }
    Ok(())
}

fn show_command() -> Result<()> {
    let config = Config::load()?;
    println!("{}", "Current settings:".bold());
    print_settings(config.get_settings())?;
    println!();
    println!("Config file: {}", Config::get_config_path()?.display());
    Ok(())
}

fn get_command(name: &str) -> Result<()> {
    info!("Getting setting: {}", name);
    let config = Config::load()?;
    println!("{}", config.get_settings().get(name)?);
    Ok(())
}

fn set_command(name: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.settings.set(name, value)?;
    config.save()?;
    println!("Set {} to {}", name, config.settings.get(name)?);
    Ok(())
}

fn reset_command(name: &str) -> Result<()> {
    info!("Resetting setting: {}", name);
    let mut config = Config::load()?;
    let default = Settings::default().get(name)?;
    config.settings.set(name, &default)?;
    config.save()?;
    println!("Reset {} to {}", name, default);
    Ok(())
}

fn reset_all_command(force: bool) -> Result<()> {
    info!("Resetting all settings to defaults");

    if !force
        && !Confirm::new()
            .with_prompt("Reset all settings to their default values?")
            .default(false)
            .interact()?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    let mut config = Config::load()?;
    config.reset_settings()?;

    println!("All settings have been reset to default values:");
    print_settings(config.get_settings())?;
    Ok(())
}
