//! Registry URL resolution

use themekit_config::Environment;

/// Registry used outside development mode
pub const DEFAULT_REGISTRY_URL: &str = "https://themes.themekit.dev/registry.json";

/// Registry served by a local development server
pub const DEV_REGISTRY_URL: &str = "http://localhost:8000/registry.json";

pub struct RegistryUrl;

impl RegistryUrl {
    /// Pick the registry URL: an explicit, non-blank value wins, otherwise the
    /// default for the environment mode
    pub fn resolve(explicit: Option<&str>, environment: Environment) -> String {
        if let Some(url) = explicit.map(str::trim).filter(|url| !url.is_empty()) {
            return url.to_string();
        }
        Self::default_for(environment).to_string()
    }

    pub fn default_for(environment: Environment) -> &'static str {
        if environment.is_development() {
            DEV_REGISTRY_URL
        } else {
            DEFAULT_REGISTRY_URL
        }
    }
}
