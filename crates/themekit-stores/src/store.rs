//! The capability set shared by every theme source

use async_trait::async_trait;

use crate::{
    error::StoreResult,
    types::{Theme, ThemeFile, ThemeNames},
};

/// A source able to answer existence, lookup and enumeration queries
///
/// Implementations must be safe to call concurrently. A missing theme is a
/// normal negative answer (`false` / `None`), never an error.
#[async_trait]
pub trait ThemeStore: Send + Sync {
    /// Short origin label, recorded in [`Theme::origin`]
    fn label(&self) -> &str;

    /// Whether the store holds a theme called `name`
    async fn exists(&self, name: &str) -> bool;

    /// Full file listing of `name`, if present
    async fn get(&self, name: &str) -> Option<Theme>;

    /// Names of every theme in the store, without duplicates
    async fn list(&self) -> StoreResult<ThemeNames>;

    /// Resolve a single file inside a theme
    async fn file(&self, theme: &str, path: &str) -> Option<ThemeFile> {
        self.get(theme).await?.file(path).cloned()
    }
}
