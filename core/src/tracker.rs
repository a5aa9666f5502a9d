//! Ties one series' collection to its document store and the session that may edit it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collection::{Collection, CollectionState};
use crate::derive::{View, derive_view};
use crate::error::StoreError;
use crate::generate::generate_default;
use crate::session::Session;
use crate::store::DocumentStore;
use crate::types::{Criteria, OwnerKey, SeriesId, VolumeId};

/// Volume count used for series the catalog does not know.
pub const FALLBACK_VOLUME_COUNT: u32 = 1;

/// Where the collection came from after a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A document existed under the owner key and was loaded as is.
    Stored,
    /// No document existed; a fresh, unsaved collection was generated.
    Generated,
}

/// Result of a toggle intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The flag flipped. `saved` is false when the follow-up write failed.
    Toggled { owned: bool, saved: bool },
    /// Session is not in admin mode; nothing changed.
    Denied,
    /// The collection has not loaded yet.
    NotLoaded,
    /// No volume with that id; nothing changed, nothing saved.
    Missed,
}

/// Non-blocking message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Collection the failure concerns.
    pub owner: OwnerKey,
    /// Human-readable description including the store error.
    pub message: String,
}

/// One series' collection, the store it persists to, and queued notices.
///
/// Starts in `Loading`; `load` moves it to `Ready`. Views of a loading tracker are empty.
#[derive(Debug)]
pub struct Tracker {
    series: SeriesId,
    owner: OwnerKey,
    store: Arc<dyn DocumentStore>,
    state: CollectionState,
    fallback_total: u32,
    notices: Vec<Notice>,
}

impl Tracker {
    /// Tracker for `series` in the `Loading` state, keyed by the series' conventional owner.
    pub fn open(series: SeriesId, store: Arc<dyn DocumentStore>) -> Self {
        let owner = OwnerKey::for_series(&series);
        Self::with_owner(series, owner, store)
    }

    /// Tracker persisting under an explicit owner key instead of `admin-{series}`.
    pub fn with_owner(series: SeriesId, owner: OwnerKey, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            series,
            owner,
            store,
            state: CollectionState::Loading,
            fallback_total: FALLBACK_VOLUME_COUNT,
            notices: Vec::new(),
        }
    }

    /// Volume count generated for a series missing from the catalog.
    pub fn with_fallback_total(mut self, total: u32) -> Self {
        self.fallback_total = total;
        self
    }

    pub fn series(&self) -> &SeriesId {
        &self.series
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn collection(&self) -> Option<&Collection> {
        self.state.collection()
    }

    /// Fetch the stored collection, or generate the default one when none exists.
    ///
    /// On failure the tracker stays in `Loading`, the error is logged and queued as a
    /// notice, and then returned.
    pub fn load(&mut self) -> Result<LoadOutcome, StoreError> {
        match self.store.load(&self.owner) {
            Ok(Some(collection)) => {
                info!(
                    owner = %self.owner,
                    volumes = collection.len(),
                    backend = self.store.kind(),
                    "collection loaded"
                );
                self.state = CollectionState::Ready(collection);
                Ok(LoadOutcome::Stored)
            }
            Ok(None) => {
                let mut collection = generate_default(&self.series, self.fallback_total);
                collection.owner = self.owner.clone();
                info!(
                    owner = %self.owner,
                    volumes = collection.len(),
                    "no stored collection, generated default"
                );
                self.state = CollectionState::Ready(collection);
                Ok(LoadOutcome::Generated)
            }
            Err(err) => {
                warn!(owner = %self.owner, error = %err, "failed to load collection");
                self.notify(format!("could not load collection: {err}"));
                Err(err)
            }
        }
    }

    /// Filtered view plus whole-collection stats; empty while loading.
    pub fn view(&self, criteria: &Criteria) -> View<'_> {
        match self.state.collection() {
            Some(collection) => derive_view(collection, criteria),
            None => View::empty(),
        }
    }

    /// Flip ownership of `id` and write the full collection back.
    ///
    /// Every successful toggle issues its own save. A failed save keeps the local change.
    pub fn toggle(&mut self, session: &Session, id: VolumeId) -> Toggle {
        if !session.is_admin() {
            debug!(owner = %self.owner, volume = id.get(), "toggle denied outside admin mode");
            return Toggle::Denied;
        }
        let Some(collection) = self.state.collection_mut() else {
            return Toggle::NotLoaded;
        };
        if !collection.toggle_owned(id) {
            debug!(owner = %self.owner, volume = id.get(), "toggle ignored, unknown volume");
            return Toggle::Missed;
        }

        let owned = collection.get(id).map(|volume| volume.owned).unwrap_or_default();
        let saved = match self.store.save(&self.owner, collection) {
            Ok(()) => {
                info!(owner = %self.owner, volume = id.get(), owned, "volume toggled and saved");
                true
            }
            Err(err) => {
                warn!(
                    owner = %self.owner,
                    volume = id.get(),
                    error = %err,
                    "failed to save collection"
                );
                self.notify(format!("volume {id} changed locally but was not saved: {err}"));
                false
            }
        };
        Toggle::Toggled { owned, saved }
    }

    /// Hand over and clear queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, message: String) {
        self.notices.push(Notice { owner: self.owner.clone(), message });
    }
}
