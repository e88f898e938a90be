//! themekit theme stores
//!
//! Every source of themes implements [`ThemeStore`]: the compiled-in
//! [`DefaultStore`], the directory-backed [`FileStore`] with its TTL cache, and
//! the [`StoreChain`] that resolves names across an ordered list of stores.

pub mod chain;
pub mod default_store;
pub mod error;
pub mod file_store;
pub mod store;
pub mod types;

pub use chain::{StoreChain, StoreChainBuilder};
pub use default_store::DefaultStore;
pub use error::{tracing_sink, ErrorSink, StoreError, StoreResult};
pub use file_store::{FileStore, FileStoreStats};
pub use store::ThemeStore;
pub use types::{is_valid_theme_name, Theme, ThemeFile, ThemeNames};
