use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::config::{Config, CredentialConfig};
use crate::error::ConfigError;

pub const CLIENT_ID_VAR: &str = "GOOGLE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GOOGLE_CLIENT_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "GOOGLE_REFRESH_TOKEN";

/// OAuth client id, secret and refresh token
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    /// Read the three variables through `lookup`, naming every one that is missing
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let client_id = read(CLIENT_ID_VAR);
        let client_secret = read(CLIENT_SECRET_VAR);
        let refresh_token = read(REFRESH_TOKEN_VAR);

        match (client_id, client_secret, refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(Credentials {
                client_id,
                client_secret,
                refresh_token,
            }),
            (client_id, client_secret, refresh_token) => {
                let mut missing = Vec::new();
                if client_id.is_none() {
                    missing.push(CLIENT_ID_VAR);
                }
                if client_secret.is_none() {
                    missing.push(CLIENT_SECRET_VAR);
                }
                if refresh_token.is_none() {
                    missing.push(REFRESH_TOKEN_VAR);
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }

    pub fn from_env() -> Result<Credentials, ConfigError> {
        info!("Reading credentials from environment variables");
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Environment (including a `.env` loaded at startup) first, then the config file
    pub fn resolve(config: &Config) -> Result<Credentials, ConfigError> {
        match Self::from_env() {
            Ok(credentials) => Ok(credentials),
            Err(env_error) => match &config.credentials {
                Some(stored) => {
                    debug!("Falling back to credentials stored in config");
                    Ok(Credentials::from(stored.clone()))
                }
                None => Err(env_error),
            },
        }
    }

    /// Contents of the `.env` file `gforms auth setup` writes
    pub fn to_env_file_contents(&self) -> String {
        format!(
            "# Google Forms CLI OAuth credentials\n\
             # Generated by: gforms auth setup\n\
             \n\
             {}={}\n\
             {}={}\n\
             {}={}\n",
            CLIENT_ID_VAR,
            self.client_id,
            CLIENT_SECRET_VAR,
            self.client_secret,
            REFRESH_TOKEN_VAR,
            self.refresh_token
        )
    }

    pub fn write_env_file(&self, path: &Path) -> std::io::Result<()> {
        info!("Writing credentials to {:?}", path);
        fs::write(path, self.to_env_file_contents())
    }
}

/// Load a `.env` file named on the command line into the process environment.
///
/// Variables already set in the environment win over the file.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::EnvFileNotFound(path.display().to_string()));
    }

    dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.display().to_string(),
        source,
    })?;
    info!("Loaded environment from {:?}", path);
    Ok(())
}

/// Whether each credential variable is currently set, for `gforms auth check`
pub fn credential_presence() -> Vec<(&'static str, bool)> {
    [CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR]
        .into_iter()
        .map(|name| {
            let present = std::env::var(name)
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false);
            (name, present)
        })
        .collect()
}

impl From<CredentialConfig> for Credentials {
    fn from(config: CredentialConfig) -> Self {
        Self {
            client_id: config.client_id,
            client_secret: config.client_secret,
            refresh_token: config.refresh_token,
        }
    }
}

impl From<Credentials> for CredentialConfig {
    fn from(credentials: Credentials) -> Self {
        Self {
            client_id: credentials.client_id,
            client_secret: credentials.client_secret,
            refresh_token: credentials.refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_variables_are_named() {
        let err = Credentials::from_lookup(|name| match name {
            CLIENT_SECRET_VAR => Some("secret".to_string()),
            CLIENT_ID_VAR => Some("   ".to_string()),
            _ => None,
        })
        .unwrap_err();

        match err {
            ConfigError::MissingCredentials(missing) => {
                assert_eq!(missing, vec![CLIENT_ID_VAR, REFRESH_TOKEN_VAR]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_written_env_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let credentials = Credentials {
            client_id: "client.apps.googleusercontent.com".to_string(),
            client_secret: "s3cret".to_string(),
            refresh_token: "1//refresh".to_string(),
        };

        credentials.write_env_file(&path).unwrap();
        let pairs: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(|entry| entry.unwrap())
            .collect();
        let loaded = Credentials::from_lookup(|name| pairs.get(name).cloned()).unwrap();
        assert_eq!(loaded, credentials);
    }

    #[test]
    fn test_load_env_file_sets_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.env");
        fs::write(&path, "GFORMS_TEST_LOADED_MARKER=present\n").unwrap();

        load_env_file(&path).unwrap();
        assert_eq!(
            std::env::var("GFORMS_TEST_LOADED_MARKER").as_deref(),
            Ok("present")
        );
    }

    #[test]
    fn test_missing_env_file() {
        let dir = TempDir::new().unwrap();
        let err = load_env_file(&dir.path().join("absent.env")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFileNotFound(_)));
    }

    #[test]
    fn test_malformed_env_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.env");
        fs::write(&path, "GFORMS_TEST_BROKEN_VALUE=\"unterminated\n").unwrap();

        let err = load_env_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert!(err.to_string().contains("broken.env"));
    }
}
