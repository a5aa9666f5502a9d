use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use vault_core::generate::generate;
use vault_core::store::Result as StoreResult;
use vault_core::{
    AdminGate, Collection, Criteria, DocumentStore, FileStore, LoadOutcome, MemoryStore, OwnerKey,
    SeriesId, Session, StoreError, Toggle, Tracker, VolumeId,
};

fn admin() -> Session {
    let mut session = Session::new();
    AdminGate::new("pw").unlock(&mut session, Some("pw"));
    session
}

fn sample() -> Collection {
    let mut c = generate(&SeriesId::new("naruto"), 72);
    c.toggle_owned(VolumeId::new(3));
    c.toggle_owned(VolumeId::new(40));
    c
}

#[test]
fn file_store_round_trips_and_overwrites() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(temp.path());
    let owner = OwnerKey::new("admin-naruto");

    assert_eq!(store.load(&owner).unwrap(), None);

    let first = sample();
    store.save(&owner, &first).unwrap();
    assert_eq!(store.load(&owner).unwrap(), Some(first.clone()));

    let second = vault_core::toggle_owned(&first, VolumeId::new(3));
    store.save(&owner, &second).unwrap();
    assert_eq!(store.load(&owner).unwrap(), Some(second));

    let reopened = FileStore::new(temp.path());
    assert_eq!(reopened.load(&owner).unwrap().map(|c| c.len()), Some(72));
}

#[test]
fn memory_store_round_trips() {
    let store = MemoryStore::new();
    let owner = OwnerKey::new("admin-naruto");
    let c = sample();
    store.save(&owner, &c).unwrap();
    assert_eq!(store.load(&owner).unwrap(), Some(c));
    assert_eq!(store.load(&OwnerKey::new("someone-else")).unwrap(), None);
}

#[test]
fn loaded_collection_is_keyed_by_the_store_key() {
    let temp = tempfile::tempdir().expect("temp dir");
    let stores: [Box<dyn DocumentStore>; 2] =
        [Box::new(FileStore::new(temp.path())), Box::new(MemoryStore::new())];
    let key = OwnerKey::new("shared-shelf");
    let c = sample();
    assert_eq!(c.owner.as_str(), "admin-naruto");

    for store in &stores {
        store.save(&key, &c).unwrap();
        let loaded = store.load(&key).unwrap().expect("stored");
        assert_eq!(loaded.owner, key, "{}", store.kind());
        assert_eq!(loaded.volumes, c.volumes);
        assert_eq!(loaded, Collection::new(key.clone(), c.volumes.clone()));
    }
}

#[test]
fn file_store_rejects_duplicate_ids() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(temp.path());
    let owner = OwnerKey::new("admin-broken");
    let mut c = sample();
    c.volumes[1].id = VolumeId::new(1);
    store.save(&owner, &c).unwrap();

    let err = store.load(&owner).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDocument { .. }));
}

/// Wraps a memory store and fails writes while `offline` is set.
#[derive(Debug, Default)]
struct FlakyStore {
    inner: MemoryStore,
    offline: AtomicBool,
}

impl DocumentStore for FlakyStore {
    fn load(&self, owner: &OwnerKey) -> StoreResult<Option<Collection>> {
        self.inner.load(owner)
    }

    fn save(&self, owner: &OwnerKey, collection: &Collection) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Remote {
                owner: owner.clone(),
                status: 503,
                message: "unavailable".into(),
            });
        }
        self.inner.save(owner, collection)
    }

    fn kind(&self) -> &'static str {
        "flaky"
    }
}

#[test]
fn failed_save_keeps_local_toggle_and_queues_notice() {
    let store = Arc::new(FlakyStore::default());
    let mut tracker = Tracker::open(SeriesId::new("one-piece"), store.clone());
    assert_eq!(tracker.load().unwrap(), LoadOutcome::Generated);

    store.offline.store(true, Ordering::SeqCst);
    let result = tracker.toggle(&admin(), VolumeId::new(7));
    assert_eq!(result, Toggle::Toggled { owned: true, saved: false });
    assert_eq!(tracker.view(&Criteria::default()).stats.owned_count, 1);
    assert!(store.inner.is_empty());

    let notices = tracker.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].owner.as_str(), "admin-one-piece");
    assert!(tracker.drain_notices().is_empty());

    // The next successful save carries the earlier local change too.
    store.offline.store(false, Ordering::SeqCst);
    tracker.toggle(&admin(), VolumeId::new(8));
    let stored = store.load(tracker.owner()).unwrap().expect("saved");
    assert_eq!(stored.volumes.iter().filter(|v| v.owned).count(), 2);
}

#[test]
fn stored_collection_wins_over_generation() {
    let store = Arc::new(MemoryStore::new());
    let owner = OwnerKey::for_series(&SeriesId::new("naruto"));
    store.save(&owner, &sample()).unwrap();

    let mut tracker = Tracker::open(SeriesId::new("naruto"), store);
    assert_eq!(tracker.load().unwrap(), LoadOutcome::Stored);
    assert_eq!(tracker.view(&Criteria::default()).stats.owned_count, 2);
}
