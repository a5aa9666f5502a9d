//! Persistence of whole collections, one document per owner key.
//!
//! Writes are full-document replaces with no version check: the last writer wins.

pub mod file;
pub mod firestore;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::StoreError;
use crate::types::{OwnerKey, Volume};

pub use file::FileStore;
#[cfg(feature = "firestore")]
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Backend holding one collection document per owner key.
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Fetch the collection stored under `owner`, `None` when no document exists.
    ///
    /// The document body holds only volumes, so the loaded collection's `owner` is always
    /// the key it was loaded from, whatever `owner` the saved collection carried.
    fn load(&self, owner: &OwnerKey) -> Result<Option<Collection>>;

    /// Replace the document under `owner` with the full volume list of `collection`.
    fn save(&self, owner: &OwnerKey, collection: &Collection) -> Result<()>;

    /// Short backend name for logs.
    fn kind(&self) -> &'static str;
}

/// Persisted document body: the ordered volume array under a `volumes` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

impl CollectionDocument {
    pub fn from_collection(collection: &Collection) -> Self {
        Self { volumes: collection.volumes.clone() }
    }

    /// Attach the owner key and check id invariants.
    pub fn into_collection(self, owner: &OwnerKey) -> Result<Collection> {
        let collection = Collection::new(owner.clone(), self.volumes);
        collection
            .validate()
            .map_err(|message| StoreError::InvalidDocument { owner: owner.clone(), message })?;
        Ok(collection)
    }
}
