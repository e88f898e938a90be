//! Registry manifest data model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Download information for one installable theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Download location of the theme archive
    pub url: String,
    /// Published version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Installable themes keyed by name, as of the last successful sync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryManifest {
    packages: BTreeMap<String, PackageDescriptor>,
    synced_at: Option<DateTime<Utc>>,
}

impl RegistryManifest {
    /// Parse a manifest document
    ///
    /// The top level must be an object mapping theme names to descriptor
    /// objects, each with at least a `url`. Unknown fields are ignored.
    pub fn parse(bytes: &[u8]) -> serde_json::Result<Self> {
        let packages: BTreeMap<String, PackageDescriptor> = serde_json::from_slice(bytes)?;
        Ok(Self {
            packages,
            synced_at: None,
        })
    }

    pub(crate) fn with_synced_at(mut self, at: DateTime<Utc>) -> Self {
        self.synced_at = Some(at);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PackageDescriptor> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Theme names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageDescriptor)> {
        self.packages.iter().map(|(name, pkg)| (name.as_str(), pkg))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Time of the sync that produced this manifest
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }

    /// Names whose name or description contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.packages
            .iter()
            .filter(|(name, pkg)| {
                name.to_lowercase().contains(&query)
                    || pkg
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
