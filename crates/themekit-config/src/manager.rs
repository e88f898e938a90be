//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config, Environment as EnvSource, File};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{error::Result, types::Environment};

/// Default configuration file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "themekit.toml";

/// Prefix for environment variable overrides (`THEMEKIT_THEMES__PATH`)
pub const ENV_PREFIX: &str = "THEMEKIT";

/// Configuration manager
///
/// Reads typed sections from the config file layered under environment
/// variables and resolves data paths.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Host data directory
    data_dir: PathBuf,
    /// Configuration file path
    config_path: PathBuf,
    /// Environment mode
    environment: Environment,
}

impl ConfigManager {
    /// Create a manager rooted at `data_dir`, reading `themekit.toml` there
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            config_path: data_dir.join(CONFIG_FILE_NAME),
            data_dir,
            environment: Environment::from_env(),
        }
    }

    /// Create a manager using the platform data directory
    pub fn with_default_data_dir() -> Self {
        Self::new(Self::default_data_dir())
    }

    /// Use a specific config file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Override the environment mode
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Get default data directory
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("themekit")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Deserialize a configuration section from file and environment
    ///
    /// A missing config file is not an error; unreadable or malformed ones are.
    pub fn read_config<T: DeserializeOwned>(&self) -> Result<T> {
        debug!("Reading config from {}", self.config_path.display());
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                EnvSource::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Resolve a configured path against the data directory
    ///
    /// An empty `relative` selects `fallback`; absolute paths are returned
    /// unchanged; an empty result resolves to the data directory itself.
    pub fn data_path(&self, relative: &str, fallback: &str) -> PathBuf {
        let chosen = if relative.trim().is_empty() {
            fallback
        } else {
            relative
        };
        if chosen.is_empty() {
            return self.data_dir.clone();
        }
        let path = Path::new(chosen);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}
