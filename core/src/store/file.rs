//! Local JSON document store: one file per owner key.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::collection::Collection;
use crate::error::StoreError;
use crate::types::OwnerKey;

use super::{CollectionDocument, DocumentStore, Result};

const APP_QUALIFIER: &str = "com";
const APP_ORGANISATION: &str = "MangaVault";
const APP_NAME: &str = "manga-vault";

/// Stores each collection document as `<blake3(owner)>.json` under a root directory.
///
/// Hashing the key keeps arbitrary owner strings safe as file names. Writes go through a
/// temp file in the same directory and are persisted over the previous document.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), lock: Mutex::new(()) }
    }

    /// Store rooted at the platform data directory (`.../manga-vault/collections`).
    pub fn in_data_dir() -> crate::Result<Self> {
        Ok(Self::new(default_root()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, owner: &OwnerKey) -> PathBuf {
        let hash = blake3::hash(owner.as_str().as_bytes());
        self.root.join(format!("{}.json", hash.to_hex()))
    }

    fn read(&self, owner: &OwnerKey) -> Result<Option<CollectionDocument>> {
        let path = self.path_for(owner);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { owner: owner.clone(), source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Serialization { owner: owner.clone(), source })
    }

    fn write(&self, owner: &OwnerKey, document: &CollectionDocument) -> Result<()> {
        let io_err = |source: io::Error| StoreError::Io { owner: owner.clone(), source };

        let data = serde_json::to_vec_pretty(document)
            .map_err(|source| StoreError::Serialization { owner: owner.clone(), source })?;

        fs::create_dir_all(&self.root).map_err(io_err)?;
        let mut temp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        temp.write_all(&data).map_err(io_err)?;
        temp.flush().map_err(io_err)?;

        let target = self.path_for(owner);
        match temp.persist(&target) {
            Ok(_) => Ok(()),
            // Some platforms refuse to rename over an existing file.
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                match fs::remove_file(&target) {
                    Ok(()) => {}
                    Err(remove_err) if remove_err.kind() == io::ErrorKind::NotFound => {}
                    Err(remove_err) => return Err(io_err(remove_err)),
                }
                err.file
                    .persist(&target)
                    .map(|_| ())
                    .map_err(|persist_err| io_err(persist_err.error))
            }
            Err(err) => Err(io_err(err.error)),
        }
    }
}

impl DocumentStore for FileStore {
    fn load(&self, owner: &OwnerKey) -> Result<Option<Collection>> {
        let _guard = self.lock.lock();
        match self.read(owner)? {
            Some(document) => {
                debug!(owner = %owner, volumes = document.volumes.len(), "loaded collection file");
                document.into_collection(owner).map(Some)
            }
            None => Ok(None),
        }
    }

    fn save(&self, owner: &OwnerKey, collection: &Collection) -> Result<()> {
        let _guard = self.lock.lock();
        self.write(owner, &CollectionDocument::from_collection(collection))?;
        debug!(owner = %owner, volumes = collection.len(), "wrote collection file");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

pub(crate) fn default_root() -> crate::Result<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANISATION, APP_NAME)
        .map(|dirs| dirs.data_dir().join("collections"))
        .ok_or_else(|| crate::error::ConfigError::NoDataDir.into())
}
