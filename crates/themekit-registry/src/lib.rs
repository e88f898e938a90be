//! Remote theme registry
//!
//! Mirrors a JSON manifest of installable themes. The manifest is refreshed
//! only when the caller asks for it via [`Registry::sync`]; a failed sync
//! leaves the last good manifest in place.

pub mod endpoint;
pub mod error;
pub mod models;
pub mod registry;

pub use endpoint::{RegistryUrl, DEFAULT_REGISTRY_URL, DEV_REGISTRY_URL};
pub use error::{SyncError, SyncFailure};
pub use models::{PackageDescriptor, RegistryManifest};
pub use registry::Registry;
