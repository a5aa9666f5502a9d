//! Typed errors surfaced by persistence and configuration.

use thiserror::Error;

use crate::types::OwnerKey;

/// Failure of a document store read or write.
///
/// A missing document is not an error: `load` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed for {owner}")]
    Io {
        owner: OwnerKey,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize document for {owner}")]
    Serialization {
        owner: OwnerKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("document for {owner} is invalid: {message}")]
    InvalidDocument { owner: OwnerKey, message: String },

    #[error("remote store answered {status} for {owner}: {message}")]
    Remote { owner: OwnerKey, status: u16, message: String },

    #[error("remote store unreachable for {owner}")]
    Transport {
        owner: OwnerKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub fn owner(&self) -> &OwnerKey {
        match self {
            StoreError::Io { owner, .. }
            | StoreError::Serialization { owner, .. }
            | StoreError::InvalidDocument { owner, .. }
            | StoreError::Remote { owner, .. }
            | StoreError::Transport { owner, .. } => owner,
        }
    }
}

/// Invalid or incomplete configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },

    #[error("{key} is required when {context}")]
    Missing { key: &'static str, context: &'static str },

    #[error("unable to resolve the application data directory")]
    NoDataDir,
}
