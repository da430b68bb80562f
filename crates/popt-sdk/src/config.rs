//! On-disk configuration.
//!
//! Loaded from a TOML file; every field has a default so an absent file or
//! a partial one both work. The API key never lives in the file: only the
//! name of the environment variable holding it does.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use popt_complete::ChatConfig;
use popt_store::DEFAULT_HISTORY_CAP;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Default name of the environment variable read for the API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the history and template documents.
    pub data_dir: PathBuf,
    /// Maximum number of history entries kept.
    pub history_cap: usize,
    /// Environment variable the API key is read from.
    pub api_key_env: String,
    pub completion: ChatConfig,
    pub server: ServerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".popt"),
            history_cap: DEFAULT_HISTORY_CAP,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            completion: ChatConfig::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// The API key from the configured environment variable, if set and
    /// non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Completion settings with the API key filled in from the environment.
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            api_key: self.api_key(),
            ..self.completion.clone()
        }
    }
}

/// The `[server]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
    /// Answer CORS preflights from any origin, for a front end served
    /// separately during development.
    pub allow_any_origin: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            allow_any_origin: true,
        }
    }
}
