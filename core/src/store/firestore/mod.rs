//! Remote document store backed by the Firestore REST API.
//!
//! Documents live at `collections/{owner}` with the volume array in a `volumes` field.
//! Reads are `GET` (404 means no document); writes are `PATCH` without an update mask,
//! which replaces the whole document.

pub mod codec;

#[cfg(feature = "firestore")]
pub use client::FirestoreStore;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_COLLECTION: &str = "collections";

/// Connection settings for [`FirestoreStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub collection: String,
    pub timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Path segments of the document for `owner`, below the base URL.
    pub fn document_segments<'a>(&'a self, owner: &'a str) -> [&'a str; 8] {
        [
            "v1",
            "projects",
            &self.project_id,
            "databases",
            "(default)",
            "documents",
            &self.collection,
            owner,
        ]
    }
}

#[cfg(feature = "firestore")]
mod client {
    use reqwest::StatusCode;
    use reqwest::Url;
    use reqwest::blocking::{Client, Response};
    use tracing::{debug, warn};

    use super::{FirestoreConfig, codec};
    use crate::collection::Collection;
    use crate::error::StoreError;
    use crate::store::{CollectionDocument, DocumentStore, Result};
    use crate::types::OwnerKey;

    #[derive(Debug)]
    pub struct FirestoreStore {
        client: Client,
        config: FirestoreConfig,
    }

    impl FirestoreStore {
        pub fn new(config: FirestoreConfig) -> crate::Result<Self> {
            let client = Client::builder().timeout(config.timeout).build()?;
            Ok(Self { client, config })
        }

        pub fn config(&self) -> &FirestoreConfig {
            &self.config
        }

        fn document_url(&self, owner: &OwnerKey) -> Result<Url> {
            let invalid = |message: String| StoreError::InvalidDocument {
                owner: owner.clone(),
                message,
            };

            let base = &self.config.base_url;
            let mut url =
                Url::parse(base).map_err(|err| invalid(format!("bad base url {base}: {err}")))?;
            url.path_segments_mut()
                .map_err(|_| invalid(format!("base url {base} cannot hold a path")))?
                .pop_if_empty()
                .extend(self.config.document_segments(owner.as_str()));
            if let Some(key) = &self.config.api_key {
                url.query_pairs_mut().append_pair("key", key);
            }
            Ok(url)
        }

        fn transport(owner: &OwnerKey, err: reqwest::Error) -> StoreError {
            StoreError::Transport { owner: owner.clone(), source: Box::new(err) }
        }

        fn remote_failure(owner: &OwnerKey, response: Response) -> StoreError {
            let status = response.status().as_u16();
            let message = response.text().unwrap_or_default();
            warn!(owner = %owner, status, "firestore rejected request");
            StoreError::Remote { owner: owner.clone(), status, message }
        }
    }

    impl DocumentStore for FirestoreStore {
        fn load(&self, owner: &OwnerKey) -> Result<Option<Collection>> {
            let url = self.document_url(owner)?;
            let response =
                self.client.get(url).send().map_err(|err| Self::transport(owner, err))?;

            if response.status() == StatusCode::NOT_FOUND {
                debug!(owner = %owner, "no firestore document");
                return Ok(None);
            }
            if !response.status().is_success() {
                return Err(Self::remote_failure(owner, response));
            }

            let body: serde_json::Value =
                response.json().map_err(|err| StoreError::InvalidDocument {
                    owner: owner.clone(),
                    message: format!("response body is not JSON: {err}"),
                })?;
            let volumes = codec::decode_document(&body)
                .map_err(|message| StoreError::InvalidDocument { owner: owner.clone(), message })?;
            debug!(owner = %owner, volumes = volumes.len(), "loaded firestore document");
            CollectionDocument { volumes }.into_collection(owner).map(Some)
        }

        fn save(&self, owner: &OwnerKey, collection: &Collection) -> Result<()> {
            let url = self.document_url(owner)?;
            let body = codec::encode_document(&collection.volumes)
                .map_err(|source| StoreError::Serialization { owner: owner.clone(), source })?;
            let response = self
                .client
                .patch(url)
                .json(&body)
                .send()
                .map_err(|err| Self::transport(owner, err))?;

            if !response.status().is_success() {
                return Err(Self::remote_failure(owner, response));
            }
            debug!(owner = %owner, volumes = collection.len(), "wrote firestore document");
            Ok(())
        }

        fn kind(&self) -> &'static str {
            "firestore"
        }
    }

}
