//! The authoritative ordered volume list of one series.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{OwnerKey, Volume, VolumeId};

/// Ordered volumes of a series plus the key the list is persisted under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub owner: OwnerKey,
    pub volumes: Vec<Volume>,
}

impl Collection {
    pub fn new(owner: OwnerKey, volumes: Vec<Volume>) -> Self {
        Self { owner, volumes }
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn get(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.iter().find(|volume| volume.id == id)
    }

    /// Invert the `owned` flag of the matching volume in place.
    ///
    /// Returns `false` and leaves the collection untouched when no volume has that id.
    pub fn toggle_owned(&mut self, id: VolumeId) -> bool {
        match self.volumes.iter_mut().find(|volume| volume.id == id) {
            Some(volume) => {
                volume.owned = !volume.owned;
                true
            }
            None => false,
        }
    }

    /// Check the id invariants a persisted document must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.volumes.len());
        for volume in &self.volumes {
            if volume.id.get() == 0 {
                return Err("volume id 0 is not a valid ordinal".to_string());
            }
            if !seen.insert(volume.id) {
                return Err(format!("duplicate volume id {}", volume.id));
            }
        }
        Ok(())
    }
}

/// Copying form of [`Collection::toggle_owned`]. An unknown id yields an equal copy.
pub fn toggle_owned(collection: &Collection, id: VolumeId) -> Collection {
    let mut next = collection.clone();
    next.toggle_owned(id);
    next
}

/// Lifecycle of the collection a tracker shows: empty until the first load resolves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollectionState {
    #[default]
    Loading,
    Ready(Collection),
}

impl CollectionState {
    pub fn collection(&self) -> Option<&Collection> {
        match self {
            CollectionState::Loading => None,
            CollectionState::Ready(collection) => Some(collection),
        }
    }

    pub fn collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            CollectionState::Loading => None,
            CollectionState::Ready(collection) => Some(collection),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CollectionState::Ready(_))
    }
}
