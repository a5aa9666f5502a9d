//! Core library for the manga collection vault.
//!
//! Holds the collection state model (volumes with an owned flag), the derivation of
//! filtered views and completion stats, default collection generation, the admin gate,
//! and the document stores collections persist to.

#![deny(missing_debug_implementations)]

pub mod catalog;
pub mod collection;
pub mod config;
pub mod derive;
pub mod error;
pub mod generate;
pub mod log;
pub mod session;
pub mod store;
pub mod tracker;
pub mod types;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

pub use catalog::{Catalog, SeriesInfo};
pub use collection::{Collection, CollectionState, toggle_owned};
pub use config::{Backend, VaultConfig};
pub use derive::{View, derive_view};
pub use error::{ConfigError, StoreError};
pub use generate::generate;
pub use session::{AdminGate, Session, Unlock};
pub use store::{DocumentStore, FileStore, MemoryStore};
pub use tracker::{LoadOutcome, Notice, Toggle, Tracker};
pub use types::{Criteria, OwnerKey, SeriesId, StatusFilter, Stats, Volume, VolumeId};

/// Returns the version of the core crate for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_semver_version() {
        assert!(version().contains('.'));
    }
}
