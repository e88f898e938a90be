//! themekit configuration
//!
//! Loads configuration sections from an optional file layered under
//! `THEMEKIT_*` environment variables, resolves paths against the host data
//! directory, and determines the environment mode (development or production).

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{Environment, ThemesConfig, ThemesSection};
