//! Configuration management for Skyline

use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default PDS endpoint.
pub const DEFAULT_SERVICE_URL: &str = "https://bsky.social";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub credentials: CredentialsFile,
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

/// Credential fields as they appear in the config file. Environment
/// variables take precedence; see [`Config::credentials`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsFile {
    pub identifier: Option<String>,
    pub app_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Seconds between polls (sky-stream default when no flag is given)
    pub interval_secs: u64,
    /// Page size requested per fetch
    pub limit: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            limit: 10,
        }
    }
}

/// Resolved credentials ready for session creation. The app password is
/// zeroed on drop.
#[derive(Debug)]
pub struct Credentials {
    pub identifier: String,
    pub app_password: SecretString,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// `SKYLINE_CONFIG` overrides the path and the file must then exist.
    /// Without the override, a missing file yields the built-in defaults so
    /// that env-var-only setups need no file at all.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("SKYLINE_CONFIG") {
            let path = PathBuf::from(shellexpand::tilde(&path).to_string());
            return Self::load_from_path(&path);
        }

        let path = default_config_path()?;
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Resolve login credentials.
    ///
    /// `SKYLINE_IDENTIFIER` / `SKYLINE_APP_PASSWORD` win over the config
    /// file. Both fields are required; a missing one is fatal at startup.
    pub fn credentials(&self) -> Result<Credentials> {
        let identifier = std::env::var("SKYLINE_IDENTIFIER")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.credentials.identifier.clone())
            .ok_or_else(|| ConfigError::MissingField("credentials.identifier".to_string()))?;

        let app_password = std::env::var("SKYLINE_APP_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.credentials.app_password.clone())
            .ok_or_else(|| ConfigError::MissingField("credentials.app_password".to_string()))?;

        Ok(Credentials {
            identifier,
            app_password: SecretString::from(app_password),
        })
    }
}

/// Resolve the configuration file path following the XDG Base Directory spec
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("skyline").join("config.toml"))
}
