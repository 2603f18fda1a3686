//! Configuration loaded from TOML, then overridden from the environment.
//!
//! ```toml
//! [store]
//! backend = "rest"            # or "memory"
//! url = "https://xyz.supabase.co"
//! api_key = "public-anon-key"
//! table = "tasks"
//! timeout_secs = 10
//!
//! [session]
//! owner = "user_2abc"
//! token = "..."
//!
//! [log]
//! filter = "info,studyplan_core=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_STORE_URL: &str = "STUDYPLAN_STORE_URL";
pub const ENV_API_KEY: &str = "STUDYPLAN_API_KEY";
pub const ENV_OWNER: &str = "STUDYPLAN_OWNER";
pub const ENV_TOKEN: &str = "STUDYPLAN_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Rest,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Rest,
            url: String::new(),
            api_key: String::new(),
            table: "tasks".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub owner: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load from a TOML file. A missing file is not an error: defaults apply.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply `STUDYPLAN_*` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_STORE_URL) {
            self.store.url = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.store.api_key = key;
        }
        if let Some(owner) = get(ENV_OWNER) {
            self.session.owner = Some(owner);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.session.token = Some(token);
        }
        self
    }
}
