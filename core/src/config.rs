//! Runtime configuration sourced from `MANGA_VAULT_*` environment variables.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::store::firestore::{DEFAULT_BASE_URL, DEFAULT_COLLECTION, FirestoreConfig};

pub const ENV_DATA_DIR: &str = "MANGA_VAULT_DATA_DIR";
pub const ENV_BACKEND: &str = "MANGA_VAULT_BACKEND";
pub const ENV_FIRESTORE_PROJECT: &str = "MANGA_VAULT_FIRESTORE_PROJECT";
pub const ENV_FIRESTORE_API_KEY: &str = "MANGA_VAULT_FIRESTORE_API_KEY";
pub const ENV_FIRESTORE_URL: &str = "MANGA_VAULT_FIRESTORE_URL";
pub const ENV_ADMIN_PASSPHRASE: &str = "MANGA_VAULT_ADMIN_PASSPHRASE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "MANGA_VAULT_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Which document store collections persist to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON files under the data directory.
    #[default]
    File,
    /// Process-local; nothing survives the process.
    Memory,
    /// Firestore REST API.
    Firestore,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "memory" => Ok(Backend::Memory),
            "firestore" => Ok(Backend::Firestore),
            other => Err(format!("expected file, memory or firestore, got `{other}`")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::File => "file",
            Backend::Memory => "memory",
            Backend::Firestore => "firestore",
        })
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root for the file backend; `None` uses the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub backend: Backend,
    /// Google Cloud project id; required by the firestore backend.
    pub firestore_project: Option<String>,
    /// Web API key appended as `?key=` to every Firestore request.
    pub firestore_api_key: Option<String>,
    /// Base URL override, e.g. a local emulator.
    pub firestore_url: Option<String>,
    /// Shared admin passphrase. Without one the admin gate stays closed.
    pub admin_passphrase: Option<String>,
    /// Request timeout for remote backends, at least one second.
    pub http_timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            backend: Backend::default(),
            firestore_project: None,
            firestore_api_key: None,
            firestore_url: None,
            admin_passphrase: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("data_dir", &self.data_dir)
            .field("backend", &self.backend)
            .field("firestore_project", &self.firestore_project)
            .field("firestore_api_key", &self.firestore_api_key.as_ref().map(|_| "<redacted>"))
            .field("firestore_url", &self.firestore_url)
            .field("admin_passphrase", &self.admin_passphrase.as_ref().map(|_| "<redacted>"))
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl VaultConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an explicit key/value source, e.g. a map in tests.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.data_dir = var(ENV_DATA_DIR).map(PathBuf::from);
        if let Some(raw) = var(ENV_BACKEND) {
            config.backend = raw.parse().map_err(|reason| ConfigError::Invalid {
                key: ENV_BACKEND,
                value: raw.clone(),
                reason,
            })?;
        }
        config.firestore_project = var(ENV_FIRESTORE_PROJECT);
        config.firestore_api_key = var(ENV_FIRESTORE_API_KEY);
        config.firestore_url = var(ENV_FIRESTORE_URL);
        config.admin_passphrase = lookup(ENV_ADMIN_PASSPHRASE).filter(|value| !value.is_empty());
        if let Some(raw) = var(ENV_HTTP_TIMEOUT_SECS) {
            let parsed = raw.trim().parse::<u64>();
            config.http_timeout_secs = match parsed {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: ENV_HTTP_TIMEOUT_SECS,
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(err) => {
                    return Err(ConfigError::Invalid {
                        key: ENV_HTTP_TIMEOUT_SECS,
                        value: raw,
                        reason: err.to_string(),
                    });
                }
            };
        } else {
            info!("{ENV_HTTP_TIMEOUT_SECS} not set, using default: {DEFAULT_HTTP_TIMEOUT_SECS}");
        }

        Ok(config)
    }

    /// Directory for the file backend, falling back to the platform data directory.
    pub fn resolved_data_dir(&self) -> crate::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::store::file::default_root(),
        }
    }

    /// Connection settings for the Firestore backend.
    pub fn firestore(&self) -> Result<FirestoreConfig, ConfigError> {
        let project = self.firestore_project.clone().ok_or(ConfigError::Missing {
            key: ENV_FIRESTORE_PROJECT,
            context: "the firestore backend is selected",
        })?;
        Ok(FirestoreConfig {
            project_id: project,
            api_key: self.firestore_api_key.clone(),
            base_url: self.firestore_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: Duration::from_secs(self.http_timeout_secs),
        })
    }
}
