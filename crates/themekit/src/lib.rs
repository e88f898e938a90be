//! themekit
//!
//! Wires the theme stores and the remote registry into a single
//! [`ThemesModule`], and hosts the `themekit` command-line tool.

pub mod cli;
pub mod error;
pub mod logging;
pub mod module;

pub use error::ModuleError;
pub use module::{ThemesModule, THEME_TTL};

pub use themekit_config as config;
pub use themekit_http as http;
pub use themekit_registry as registry;
pub use themekit_stores as stores;
