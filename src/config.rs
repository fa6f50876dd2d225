use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::constants::DEFAULT_CHUNK_SIZE;

/// OAuth client credentials stored in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub credentials: Option<CredentialConfig>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Maximum operations per duplication batch
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Page size for `forms list`
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
    /// Page size when paging through responses
    #[serde(default = "default_response_page_size")]
    pub response_page_size: u32,
    /// Placeholders `forms personalize --name` fills in
    #[serde(default = "default_personalize_placeholders")]
    pub personalize_placeholders: Vec<String>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_list_page_size() -> u32 {
    50
}

fn default_response_page_size() -> u32 {
    100
}

fn default_personalize_placeholders() -> Vec<String> {
    vec!["NAME".to_string(), "Employee Name".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            list_page_size: default_list_page_size(),
            response_page_size: default_response_page_size(),
            personalize_placeholders: default_personalize_placeholders(),
        }
    }
}

/// Setting names accepted by `gforms settings get|set`
pub const SETTING_KEYS: [&str; 4] = [
    "chunk-size",
    "list-page-size",
    "response-page-size",
    "personalize-placeholders",
];

impl Settings {
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "chunk-size" => Ok(self.chunk_size.to_string()),
            "list-page-size" => Ok(self.list_page_size.to_string()),
            "response-page-size" => Ok(self.response_page_size.to_string()),
            "personalize-placeholders" => Ok(self.personalize_placeholders.join(",")),
            _ => anyhow::bail!(
                "Unknown setting '{}'. Available settings: {}",
                key,
                SETTING_KEYS.join(", ")
            ),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "chunk-size" => {
                let size: usize = value
                    .parse()
                    .with_context(|| format!("Invalid chunk size: {}", value))?;
                if size == 0 {
                    anyhow::bail!("Chunk size must be at least 1");
                }
                self.chunk_size = size;
            }
            "list-page-size" => {
                self.list_page_size = parse_page_size(value)?;
            }
            "response-page-size" => {
                self.response_page_size = parse_page_size(value)?;
            }
            "personalize-placeholders" => {
                let placeholders: Vec<String> = value
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect();
                if placeholders.is_empty() {
                    anyhow::bail!("At least one placeholder is required");
                }
                self.personalize_placeholders = placeholders;
            }
            _ => anyhow::bail!(
                "Unknown setting '{}'. Available settings: {}",
                key,
                SETTING_KEYS.join(", ")
            ),
        }
        info!("Updated setting {} to {}", key, value);
        Ok(())
    }
}

fn parse_page_size(value: &str) -> Result<u32> {
    let size: u32 = value
        .parse()
        .with_context(|| format!("Invalid page size: {}", value))?;
    if size == 0 {
        anyhow::bail!("Page size must be at least 1");
    }
    Ok(size)
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("gforms-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".gforms-cli")
        };

        // Ensure the directory exists
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using default config");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!(
            "Loaded config (stored credentials: {})",
            config.credentials.is_some()
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_credentials(&mut self, credentials: CredentialConfig) -> Result<()> {
        info!("Storing credentials for client {}", credentials.client_id);
        self.credentials = Some(credentials);
        self.save()
    }

    pub fn reset_settings(&mut self) -> Result<()> {
        info!("Resetting settings to defaults");
        self.settings = Settings::default();
        self.save()
    }
}
