//! Module setup errors

use themekit_config::ConfigError;
use themekit_stores::StoreError;
use thiserror::Error;

/// Failures that prevent the themes module from being set up
///
/// Registry sync failures are deliberately absent: they are logged and the
/// module starts with an empty manifest.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Theme store error: {0}")]
    Store(#[from] StoreError),
}

impl ModuleError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            ModuleError::Config(e) => format!(
                "Configuration error: {}\n\nCheck the [themes] section of your config file \
                 and THEMEKIT_* variables.",
                e
            ),
            ModuleError::Store(e) => format!(
                "Theme store error: {}\n\nCheck that the themes directory exists and is readable.",
                e
            ),
        }
    }
}
