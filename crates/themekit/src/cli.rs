//! Command-line interface
//!
//! Argument parsing and the rendering of each subcommand. Commands return
//! their output as text so the binary decides where it goes.

use std::{fmt::Write as _, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use themekit_config::ConfigManager;
use themekit_http::HttpConfig;
use themekit_registry::SyncError;
use themekit_stores::{StoreError, ThemeStore};
use thiserror::Error;

use crate::module::ThemesModule;

/// themekit - resolve themes from built-in, on-disk and remote sources
#[derive(Parser, Debug)]
#[command(name = "themekit")]
#[command(bin_name = "themekit")]
#[command(about = "Resolve themes from built-in, on-disk and remote sources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/themekit.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Registry request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Proxy for registry requests
    #[arg(long, global = true, value_name = "URL")]
    pub proxy: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every resolvable theme with the store it comes from
    List,

    /// Show the files of a theme
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print the registry manifest
    Registry,

    /// Search the registry by name or description
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Print the resolved registry URL
    Url,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Theme '{0}' not found")]
    ThemeNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl Cli {
    /// Configuration manager for the selected data directory and config file
    pub fn config_manager(&self) -> ConfigManager {
        let manager = match &self.data_dir {
            Some(dir) => ConfigManager::new(dir),
            None => ConfigManager::with_default_data_dir(),
        };
        match &self.config {
            Some(path) => manager.with_config_file(path),
            None => manager,
        }
    }

    /// HTTP settings for registry fetches, with any flag overrides applied
    pub fn http_config(&self) -> HttpConfig {
        let mut config = HttpConfig::registry()
            .with_user_agent(format!("themekit-cli/{}", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.as_str());
        }
        config
    }
}

/// Run `command` against a set-up module and return what it prints
pub async fn execute(command: &Commands, module: &ThemesModule) -> Result<String, CommandError> {
    match command {
        Commands::List => list(module).await,
        Commands::Show { name } => show(module, name).await,
        Commands::Registry => registry(module).await,
        Commands::Search { query } => search(module, query).await,
        Commands::Url => Ok(format!("{}\n", module.registry_url())),
    }
}

async fn list(module: &ThemesModule) -> Result<String, CommandError> {
    let chain = module.stores();
    let mut out = String::new();
    for name in &chain.list().await? {
        // A theme may disappear between listing and resolving
        if let Some((_, theme)) = chain.resolve(name).await {
            let _ = writeln!(out, "{:<24} {}", theme.name, theme.origin);
        }
    }
    Ok(out)
}

async fn show(module: &ThemesModule, name: &str) -> Result<String, CommandError> {
    let (_, theme) = module
        .stores()
        .resolve(name)
        .await
        .ok_or_else(|| CommandError::ThemeNotFound(name.to_string()))?;

    let mut out = String::new();
    let _ = writeln!(out, "{} ({}, {} file(s))", theme.name, theme.origin, theme.len());
    for path in theme.paths() {
        let _ = writeln!(out, "  {}", path);
    }
    Ok(out)
}

/// Sync again only if the sync during setup did not succeed
async fn ensure_synced(module: &ThemesModule) -> Result<(), CommandError> {
    if !module.registry().is_synced() {
        module.registry().sync().await?;
    }
    Ok(())
}

async fn registry(module: &ThemesModule) -> Result<String, CommandError> {
    ensure_synced(module).await?;
    let manifest = module.registry().manifest();

    let mut out = String::new();
    for (name, package) in manifest.iter() {
        let version = package.version.as_deref().unwrap_or("-");
        let _ = writeln!(out, "{:<24} {:<10} {}", name, version, package.url);
    }
    Ok(out)
}

async fn search(module: &ThemesModule, query: &str) -> Result<String, CommandError> {
    ensure_synced(module).await?;
    let manifest = module.registry().manifest();

    let mut out = String::new();
    for name in manifest.search(query) {
        let description = manifest
            .get(name)
            .and_then(|p| p.description.as_deref())
            .unwrap_or("");
        let _ = writeln!(out, "{:<24} {}", name, description);
    }
    Ok(out)
}
