//! Process-local document store.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::collection::Collection;
use crate::types::{OwnerKey, Volume};

use super::{DocumentStore, Result};

/// Keeps documents in a map; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<OwnerKey, Vec<Volume>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, owner: &OwnerKey) -> Result<Option<Collection>> {
        let documents = self.documents.lock();
        Ok(documents.get(owner).map(|volumes| Collection::new(owner.clone(), volumes.clone())))
    }

    fn save(&self, owner: &OwnerKey, collection: &Collection) -> Result<()> {
        self.documents.lock().insert(owner.clone(), collection.volumes.clone());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
