//! Themes module façade
//!
//! Builds the store chain and the registry from configuration once, at
//! startup. Everything else in the host receives the module (or one of its
//! handles) explicitly.

use std::{sync::Arc, time::Duration};

use themekit_config::{ConfigManager, ThemesConfig};
use themekit_http::HttpClientTrait;
use themekit_registry::{Registry, RegistryUrl};
use themekit_stores::{
    tracing_sink, DefaultStore, ErrorSink, FileStore, StoreChain, ThemeStore,
};
use tracing::{info, warn};

use crate::error::ModuleError;

/// Cache lifetime of the on-disk theme listings
pub const THEME_TTL: Duration = Duration::from_secs(10);

/// Directory name used when `themes.path` is not configured
pub const THEMES_DIR: &str = "themes";

/// Directory holding themes managed by the host itself
pub const INTERNAL_THEMES_DIR: &str = "internal_themes";

pub struct ThemesModule {
    stores: Arc<StoreChain>,
    theme_store: Arc<FileStore>,
    internal_store: Arc<FileStore>,
    registry: Arc<Registry>,
}

impl ThemesModule {
    /// Set up stores and registry, reporting store failures through tracing
    pub async fn setup(
        config: &ConfigManager,
        client: Arc<dyn HttpClientTrait>,
    ) -> Result<Self, ModuleError> {
        Self::setup_with_sink(config, client, tracing_sink()).await
    }

    /// Set up stores and registry with a caller-supplied error sink
    ///
    /// Configuration and store construction errors are fatal. A failed
    /// registry sync is logged and leaves the registry empty.
    pub async fn setup_with_sink(
        config: &ConfigManager,
        client: Arc<dyn HttpClientTrait>,
        sink: ErrorSink,
    ) -> Result<Self, ModuleError> {
        let themes_config: ThemesConfig = config.read_config()?;
        themes_config.validate()?;

        let themes_path = config.data_path(&themes_config.themes.path, THEMES_DIR);
        let theme_store = Arc::new(
            FileStore::new(themes_path, THEME_TTL, sink.clone())?.with_label("themes"),
        );

        let internal_path = config.data_path(INTERNAL_THEMES_DIR, "");
        let internal_store = Arc::new(
            FileStore::new(internal_path, THEME_TTL, sink.clone())?.with_label("internal"),
        );

        let stores = StoreChain::builder()
            .push(DefaultStore::new())
            .push_shared(theme_store.clone())
            .push_shared(internal_store.clone())
            .error_sink(sink)
            .build();

        let url = RegistryUrl::resolve(themes_config.registry_url(), config.environment());
        let registry = Registry::new(url, client);
        if let Err(e) = registry.sync().await {
            warn!("{}", e);
        }

        info!(
            "Themes module ready: stores {:?}, registry {} ({} package(s))",
            stores,
            registry.url(),
            registry.manifest().len()
        );

        Ok(Self {
            stores: Arc::new(stores),
            theme_store,
            internal_store,
            registry: Arc::new(registry),
        })
    }

    /// Store chain in precedence order: built-in, configured, internal
    pub fn stores(&self) -> &StoreChain {
        &self.stores
    }

    /// Shared handle to the chain, for handing to other components
    pub fn stores_handle(&self) -> Arc<dyn ThemeStore> {
        self.stores.clone()
    }

    pub fn theme_store(&self) -> &Arc<FileStore> {
        &self.theme_store
    }

    pub fn internal_store(&self) -> &Arc<FileStore> {
        &self.internal_store
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn registry_url(&self) -> &str {
        self.registry.url()
    }
}

impl std::fmt::Debug for ThemesModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemesModule")
            .field("stores", &self.stores)
            .field("registry", &self.registry)
            .finish()
    }
}
