//! Registry synchronization

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use themekit_http::HttpClientTrait;
use tracing::{debug, info};

use crate::{error::SyncError, models::{PackageDescriptor, RegistryManifest}};

/// Mirror of one remote theme manifest
///
/// Reads always see a complete manifest: the one from the last successful
/// sync, or an empty one before any sync succeeded.
pub struct Registry {
    url: String,
    client: Arc<dyn HttpClientTrait>,
    manifest: RwLock<Arc<RegistryManifest>>,
}

impl Registry {
    pub fn new(url: impl Into<String>, client: Arc<dyn HttpClientTrait>) -> Self {
        Self {
            url: url.into(),
            client,
            manifest: RwLock::new(Arc::new(RegistryManifest::default())),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the manifest, replacing the current one on success
    ///
    /// Returns the number of packages in the new manifest. On failure the
    /// current manifest is left untouched. There is no retry.
    pub async fn sync(&self) -> Result<usize, SyncError> {
        debug!("Syncing theme registry from {}", self.url);
        let body = self
            .client
            .get_bytes(&self.url)
            .await
            .map_err(|e| SyncError::new(&self.url, e))?;
        let manifest = RegistryManifest::parse(&body)
            .map_err(|e| SyncError::new(&self.url, e))?
            .with_synced_at(Utc::now());

        let count = manifest.len();
        *self.manifest.write() = Arc::new(manifest);
        info!("Theme registry synced: {} package(s) from {}", count, self.url);
        Ok(count)
    }

    /// Snapshot of the last good manifest
    pub fn manifest(&self) -> Arc<RegistryManifest> {
        self.manifest.read().clone()
    }

    pub fn get(&self, name: &str) -> Option<PackageDescriptor> {
        self.manifest.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.manifest.read().names().map(str::to_string).collect()
    }

    pub fn is_synced(&self) -> bool {
        self.last_synced().is_some()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.manifest.read().synced_at()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let manifest = self.manifest();
        f.debug_struct("Registry")
            .field("url", &self.url)
            .field("packages", &manifest.len())
            .field("synced_at", &manifest.synced_at())
            .finish()
    }
}
