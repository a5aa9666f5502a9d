use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::Serialize;
use vault_core::catalog::title_from_slug;
use vault_core::{
    AdminGate, Backend, Catalog, Criteria, DocumentStore, FileStore, LoadOutcome, MemoryStore,
    Session, SeriesId, StatusFilter, Stats, Toggle, Tracker, Unlock, Volume, VaultConfig,
};

pub struct AppState {
    config: VaultConfig,
    store: Arc<dyn DocumentStore>,
    gate: AdminGate,
    session: Mutex<Session>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store.kind())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: VaultConfig, store: Arc<dyn DocumentStore>) -> Self {
        let gate = AdminGate::from_config(config.admin_passphrase.as_deref());
        Self { config, store, gate, session: Mutex::new(Session::new()) }
    }

    /// Open the backend named by `config` and build the state around it.
    pub fn from_config(config: VaultConfig) -> anyhow::Result<Self> {
        let store = open_store(&config)?;
        Ok(Self::new(config, store))
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub fn is_admin(&self) -> bool {
        self.with_session(|session| Ok(session.is_admin())).unwrap_or(false)
    }

    fn with_session<F, T>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut Session) -> Result<T, String>,
    {
        let mut guard = self.session.lock().map_err(|_| "session state poisoned".to_string())?;
        f(&mut guard)
    }

    fn tracker(&self, series: &str) -> Result<(Tracker, LoadOutcome), String> {
        let series = parse_series(series)?;
        let mut tracker = Tracker::open(series, Arc::clone(&self.store));
        let outcome = tracker.load().map_err(|err| err.to_string())?;
        Ok((tracker, outcome))
    }
}

pub fn open_store(config: &VaultConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        Backend::File => {
            let root = config.resolved_data_dir().context("resolving data directory")?;
            Arc::new(FileStore::new(root))
        }
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::Firestore => firestore_store(config)?,
    };
    tracing::debug!(backend = store.kind(), "document store ready");
    Ok(store)
}

#[cfg(feature = "firestore")]
fn firestore_store(config: &VaultConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let settings = config.firestore()?;
    Ok(Arc::new(vault_core::store::FirestoreStore::new(settings)?))
}

#[cfg(not(feature = "firestore"))]
fn firestore_store(_config: &VaultConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    anyhow::bail!("this build does not include the firestore backend")
}

fn parse_series(raw: &str) -> Result<SeriesId, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("series id must not be empty".to_string());
    }
    Ok(SeriesId::new(trimmed.to_ascii_lowercase()))
}

fn series_title(series: &SeriesId) -> String {
    Catalog::builtin()
        .find(series)
        .map(|info| info.title.to_string())
        .unwrap_or_else(|| title_from_slug(series.as_str()))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub total_volumes: u32,
    pub years: &'static str,
    pub tagline: &'static str,
    pub next: &'static str,
    pub previous: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    pub series: String,
    pub title: String,
    /// True when nothing was stored yet and the default collection is shown.
    pub generated: bool,
    pub criteria: Criteria,
    pub stats: Stats,
    pub volumes: Vec<Volume>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDetail {
    pub series: String,
    pub volume: Volume,
    pub released: Option<String>,
    pub status: &'static str,
    pub format: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleOutcome {
    Toggled { owned: bool, saved: bool },
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLine {
    pub number: u32,
    pub outcome: ToggleOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReport {
    pub series: String,
    /// The passphrase prompt was dismissed; nothing was attempted.
    pub cancelled: bool,
    pub results: Vec<ToggleLine>,
    pub notices: Vec<String>,
    pub stats: Stats,
}

pub fn list_series() -> Vec<SeriesEntry> {
    let catalog = Catalog::builtin();
    let all = catalog.series();
    all.iter()
        .enumerate()
        .map(|(index, info)| SeriesEntry {
            id: info.id,
            title: info.title,
            total_volumes: info.total_volumes,
            years: info.years,
            tagline: info.tagline,
            next: all[catalog.next(index)].id,
            previous: all[catalog.previous(index)].id,
        })
        .collect()
}

pub fn show_collection(
    state: &AppState,
    series: &str,
    status: StatusFilter,
    search: &str,
) -> Result<CollectionPage, String> {
    let (tracker, outcome) = state.tracker(series)?;
    let criteria = Criteria::new(status, search);
    let view = tracker.view(&criteria);

    Ok(CollectionPage {
        series: tracker.series().to_string(),
        title: series_title(tracker.series()),
        generated: outcome == LoadOutcome::Generated,
        stats: view.stats,
        volumes: view.volumes.into_iter().cloned().collect(),
        criteria,
    })
}

pub fn volume_detail(state: &AppState, series: &str, number: u32) -> Result<VolumeDetail, String> {
    let (tracker, _) = state.tracker(series)?;
    let volume = tracker
        .collection()
        .and_then(|collection| collection.volumes.iter().find(|volume| volume.number == number))
        .cloned()
        .ok_or_else(|| format!("{} has no volume #{number}", tracker.series()))?;

    Ok(VolumeDetail {
        series: series_title(tracker.series()),
        released: volume.release_date.map(|date| date.format("%B %-d, %Y").to_string()),
        status: if volume.owned { "In collection" } else { "Missing" },
        format: "Physical",
        volume,
    })
}

/// Enter admin mode if needed, then flip each listed volume and save after every flip.
///
/// `passphrase` is what the user typed at the prompt; `None` or an empty entry cancels
/// silently. A wrong passphrase is an error and nothing is toggled.
pub fn toggle_volumes(
    state: &AppState,
    series: &str,
    numbers: &[u32],
    passphrase: Option<&str>,
) -> Result<ToggleReport, String> {
    let session = state.with_session(|session| {
        if session.is_admin() {
            return Ok(Some(*session));
        }
        match state.gate.unlock(session, passphrase) {
            Unlock::Granted => Ok(Some(*session)),
            Unlock::Cancelled => Ok(None),
            Unlock::Rejected => Err("incorrect admin passphrase".to_string()),
            Unlock::Unavailable => {
                Err("admin mode is disabled: no admin passphrase is configured".to_string())
            }
        }
    })?;

    let (mut tracker, _) = state.tracker(series)?;
    let Some(session) = session else {
        return Ok(ToggleReport {
            series: tracker.series().to_string(),
            cancelled: true,
            results: Vec::new(),
            notices: Vec::new(),
            stats: tracker.view(&Criteria::default()).stats,
        });
    };

    let mut results = Vec::with_capacity(numbers.len());
    for &number in numbers {
        let id = tracker
            .collection()
            .and_then(|collection| collection.volumes.iter().find(|volume| volume.number == number))
            .map(|volume| volume.id);
        let outcome = match id.map(|id| tracker.toggle(&session, id)) {
            Some(Toggle::Toggled { owned, saved }) => ToggleOutcome::Toggled { owned, saved },
            Some(Toggle::Denied) => return Err("admin mode is required to edit".to_string()),
            Some(Toggle::NotLoaded) => return Err("collection is still loading".to_string()),
            Some(Toggle::Missed) | None => ToggleOutcome::NotFound,
        };
        results.push(ToggleLine { number, outcome });
    }

    let notices = tracker.drain_notices().into_iter().map(|notice| notice.message).collect();
    Ok(ToggleReport {
        series: tracker.series().to_string(),
        cancelled: false,
        results,
        notices,
        stats: tracker.view(&Criteria::default()).stats,
    })
}
