//! Precedence-ordered resolution across several stores
//!
//! Lookups go through the stores in order and stop at the first hit, so an
//! earlier store shadows identically-named themes in later ones. Listing asks
//! every store and merges the names, keeping first-seen order.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::{tracing_sink, ErrorSink, StoreResult},
    store::ThemeStore,
    types::{Theme, ThemeNames},
};

/// Ordered list of stores, fixed at construction
#[derive(Clone)]
pub struct StoreChain {
    stores: Vec<Arc<dyn ThemeStore>>,
    sink: ErrorSink,
}

impl StoreChain {
    pub const LABEL: &'static str = "chain";

    /// Chain over `stores`, highest precedence first
    pub fn new(stores: Vec<Arc<dyn ThemeStore>>) -> Self {
        Self {
            stores,
            sink: tracing_sink(),
        }
    }

    pub fn builder() -> StoreChainBuilder {
        StoreChainBuilder::default()
    }

    /// Route failures of individual stores to `sink`
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn stores(&self) -> &[Arc<dyn ThemeStore>] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Resolve `name`, returning the index of the store that won
    pub async fn resolve(&self, name: &str) -> Option<(usize, Theme)> {
        for (index, store) in self.stores.iter().enumerate() {
            if let Some(theme) = store.get(name).await {
                debug!("Resolved theme '{}' from store '{}'", name, store.label());
                return Some((index, theme));
            }
        }
        None
    }
}

impl std::fmt::Debug for StoreChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stores.iter().map(|s| s.label().to_string()))
            .finish()
    }
}

#[async_trait]
impl ThemeStore for StoreChain {
    fn label(&self) -> &str {
        Self::LABEL
    }

    async fn exists(&self, name: &str) -> bool {
        for store in &self.stores {
            if store.exists(name).await {
                return true;
            }
        }
        false
    }

    async fn get(&self, name: &str) -> Option<Theme> {
        self.resolve(name).await.map(|(_, theme)| theme)
    }

    /// Union of every store's names; failing stores contribute nothing
    async fn list(&self) -> StoreResult<ThemeNames> {
        let mut names = ThemeNames::new();
        for store in &self.stores {
            match store.list().await {
                Ok(found) => names.extend(found),
                Err(err) => {
                    debug!("Store '{}' failed to list themes", store.label());
                    (self.sink)(&err);
                }
            }
        }
        Ok(names)
    }
}

/// Incremental construction of a [`StoreChain`]
#[derive(Default)]
pub struct StoreChainBuilder {
    stores: Vec<Arc<dyn ThemeStore>>,
    sink: Option<ErrorSink>,
}

impl StoreChainBuilder {
    /// Append a store with lower precedence than those already added
    pub fn push(mut self, store: impl ThemeStore + 'static) -> Self {
        self.stores.push(Arc::new(store));
        self
    }

    /// Append a shared store handle
    pub fn push_shared(mut self, store: Arc<dyn ThemeStore>) -> Self {
        self.stores.push(store);
        self
    }

    pub fn error_sink(mut self, sink: ErrorSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> StoreChain {
        let chain = StoreChain::new(self.stores);
        match self.sink {
            Some(sink) => chain.with_error_sink(sink),
            None => chain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_store::DefaultStore, error::StoreError, types::ThemeFile};
    use std::{
        collections::BTreeMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// In-memory store used to exercise precedence
    struct MapStore {
        label: &'static str,
        themes: BTreeMap<String, Theme>,
    }

    impl MapStore {
        fn new(label: &'static str, names: &[&str]) -> Self {
            let themes = names
                .iter()
                .map(|name| {
                    let theme = Theme::new(*name, label)
                        .with_file(ThemeFile::embedded(format!("{}.html", label), b""));
                    (name.to_string(), theme)
                })
                .collect();
            Self { label, themes }
        }
    }

    #[async_trait]
    impl ThemeStore for MapStore {
        fn label(&self) -> &str {
            self.label
        }

        async fn exists(&self, name: &str) -> bool {
            self.themes.contains_key(name)
        }

        async fn get(&self, name: &str) -> Option<Theme> {
            self.themes.get(name).cloned()
        }

        async fn list(&self) -> StoreResult<ThemeNames> {
            Ok(self.themes.keys().cloned().collect())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ThemeStore for BrokenStore {
        fn label(&self) -> &str {
            "broken"
        }

        async fn exists(&self, _name: &str) -> bool {
            false
        }

        async fn get(&self, _name: &str) -> Option<Theme> {
            None
        }

        async fn list(&self) -> StoreResult<ThemeNames> {
            Err(StoreError::Unavailable {
                store: "broken".to_string(),
                message: "offline".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_first_store_wins() {
        let chain = StoreChain::builder()
            .push(MapStore::new("first", &["shared", "only-first"]))
            .push(MapStore::new("second", &["shared", "only-second"]))
            .build();

        let (index, theme) = chain.resolve("shared").await.unwrap();
        assert_eq!(index, 0);
        assert_eq!(theme.origin, "first");

        let theme = chain.get("only-second").await.unwrap();
        assert_eq!(theme.origin, "second");
        assert!(chain.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_merges_in_order() {
        let chain = StoreChain::builder()
            .push(MapStore::new("first", &["b", "a"]))
            .push(MapStore::new("second", &["c", "a"]))
            .build();

        let names = chain.list().await.unwrap();
        // MapStore lists in key order
        assert_eq!(names.as_slice(), &["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_store_is_reported_not_propagated() {
        let reported = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&reported);
        let chain = StoreChain::builder()
            .push(BrokenStore)
            .push(MapStore::new("second", &["kept"]))
            .error_sink(Arc::new(move |_err: &StoreError| {
                seen.fetch_add(1, Ordering::SeqCst);
            }))
            .build();

        let names = chain.list().await.unwrap();
        assert_eq!(names.as_slice(), &["kept"]);
        assert_eq!(reported.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_nests() {
        let inner = StoreChain::builder()
            .push(MapStore::new("inner", &["nested"]))
            .build();
        let outer = StoreChain::builder()
            .push(DefaultStore::new())
            .push(inner)
            .build();

        assert!(outer.exists("basic").await);
        assert!(outer.exists("nested").await);
        assert_eq!(outer.get("nested").await.unwrap().origin, "inner");
        assert_eq!(outer.list().await.unwrap().as_slice(), &["basic", "nested"]);
    }

    #[tokio::test]
    async fn test_file_resolves_through_chain() {
        let chain = StoreChain::builder()
            .push(MapStore::new("first", &["shared"]))
            .push(MapStore::new("second", &["shared"]))
            .build();

        assert!(chain.file("shared", "first.html").await.is_some());
        // Shadowed theme: files from later stores are not merged in
        assert!(chain.file("shared", "second.html").await.is_none());
    }

    #[test]
    fn test_debug_lists_labels() {
        let chain = StoreChain::builder()
            .push(DefaultStore::new())
            .push(MapStore::new("disk", &[]))
            .build();
        assert_eq!(format!("{:?}", chain), "[\"default\", \"disk\"]");
        assert_eq!(chain.len(), 2);
    }
}
