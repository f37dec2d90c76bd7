use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "plantpal.toml";

/// Environment variable that overrides `api_base_url` from the config file.
pub const API_BASE_URL_ENV: &str = "PLANTPAL_API_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("No API base URL configured. Set `api_base_url` in {path} or the {API_BASE_URL_ENV} environment variable.")]
    MissingBaseUrl { path: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL of the PlantPal REST backend, e.g. `http://localhost:5100`.
    #[serde(default)]
    pub api_base_url: String,
    /// Where the signed-in session is persisted.
    #[serde(default = "default_session_path")]
    pub session_path: String,
}

fn default_session_path() -> String {
    "plantpal_session.toml".to_string()
}

/// Loads the client configuration, merging the config file (if present) with
/// environment overrides. A missing file is fine as long as the base URL is
/// provided through the environment.
pub fn load_config(config_path_str: &str) -> Result<ClientConfig, ConfigError> {
    let config_path = Path::new(config_path_str);

    let mut config = if config_path.exists() {
        let config_str = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path_str.to_string(),
            source,
        })?;
        toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: config_path_str.to_string(),
            source,
        })?
    } else {
        ClientConfig {
            session_path: default_session_path(),
            ..ClientConfig::default()
        }
    };

    if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_base_url = url;
        }
    }

    if config.api_base_url.trim().is_empty() {
        return Err(ConfigError::MissingBaseUrl {
            path: config_path_str.to_string(),
        });
    }

    // Trailing slashes would produce `//users/...` when joined with paths.
    while config.api_base_url.ends_with('/') {
        config.api_base_url.pop();
    }

    info!(base_url = %config.api_base_url, "Loaded client configuration.");
    Ok(config)
}
