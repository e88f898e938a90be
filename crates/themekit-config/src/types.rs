//! Core configuration types

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable selecting the environment mode
pub const ENV_MODE_VAR: &str = "THEMEKIT_ENV";

/// Runtime environment mode of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Read the mode from `THEMEKIT_ENV`, defaulting to production
    pub fn from_env() -> Self {
        std::env::var(ENV_MODE_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" | "" => Ok(Environment::Production),
            other => Err(ConfigError::Env(format!(
                "unknown environment mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Top-level shape holding the `[themes]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ThemesConfig {
    #[serde(default)]
    pub themes: ThemesSection,
}

/// The `[themes]` configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ThemesSection {
    /// On-disk location of the mutable theme store, relative to the data
    /// directory unless absolute. Empty means the default location.
    #[serde(default)]
    pub path: String,
    /// Registry manifest URL overriding the environment default
    #[serde(default)]
    pub registry_url: Option<String>,
}

impl ThemesConfig {
    /// Reject override URLs that cannot be fetched
    pub fn validate(&self) -> Result<()> {
        if let Some(raw) = self.registry_url() {
            let parsed = url::Url::parse(raw)
                .map_err(|e| ConfigError::Validation(format!("themes.registry_url: {}", e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Validation(format!(
                    "themes.registry_url must be http(s), got '{}'",
                    parsed.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Override URL, with blank values treated as unset
    pub fn registry_url(&self) -> Option<&str> {
        self.themes
            .registry_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(
            "Development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_blank_registry_url_is_unset() {
        let config = ThemesConfig {
            themes: ThemesSection {
                path: String::new(),
                registry_url: Some("   ".to_string()),
            },
        };
        assert_eq!(config.registry_url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ThemesConfig {
            themes: ThemesSection {
                path: String::new(),
                registry_url: Some("ftp://example.com/registry.json".to_string()),
            },
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
