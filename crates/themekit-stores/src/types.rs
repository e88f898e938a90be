//! Core theme types

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::StoreResult;

/// Check that a theme name is usable as a single path segment
///
/// Names that fail this check are never found in any store.
pub fn is_valid_theme_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FileSource {
    Embedded(&'static [u8]),
    Disk(PathBuf),
}

/// One file inside a theme, addressed relative to the theme root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFile {
    path: String,
    source: FileSource,
}

impl ThemeFile {
    /// File compiled into the binary
    pub fn embedded(path: impl Into<String>, contents: &'static [u8]) -> Self {
        Self {
            path: path.into(),
            source: FileSource::Embedded(contents),
        }
    }

    /// File living on disk at `location`
    pub fn on_disk(path: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: FileSource::Disk(location.into()),
        }
    }

    /// Path relative to the theme root, `/`-separated
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.source, FileSource::Embedded(_))
    }

    /// Absolute location for on-disk files
    pub fn location(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Disk(location) => Some(location),
            FileSource::Embedded(_) => None,
        }
    }

    /// Read the file contents
    pub async fn read(&self) -> StoreResult<Vec<u8>> {
        match &self.source {
            FileSource::Embedded(contents) => Ok(contents.to_vec()),
            FileSource::Disk(location) => Ok(tokio::fs::read(location).await?),
        }
    }

    /// Modification time; embedded files have none
    pub async fn modified(&self) -> StoreResult<Option<SystemTime>> {
        match &self.source {
            FileSource::Embedded(_) => Ok(None),
            FileSource::Disk(location) => {
                let metadata = tokio::fs::metadata(location).await?;
                Ok(Some(metadata.modified()?))
            }
        }
    }
}

/// A named bundle of template and asset files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Label of the store the theme was resolved from
    pub origin: String,
    /// Files keyed by their path relative to the theme root
    pub files: BTreeMap<String, ThemeFile>,
    /// Time of the directory scan that produced this theme (cached stores only)
    pub refreshed_at: Option<SystemTime>,
}

impl Theme {
    pub fn new(name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            files: BTreeMap::new(),
            refreshed_at: None,
        }
    }

    /// Add a file, keyed by its relative path
    pub fn with_file(mut self, file: ThemeFile) -> Self {
        self.files.insert(file.path().to_string(), file);
        self
    }

    /// Look up a file by relative path; a leading `/` is ignored
    pub fn file(&self, path: &str) -> Option<&ThemeFile> {
        self.files.get(path.trim_start_matches('/'))
    }

    /// Relative file paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Ordered, duplicate-free list of theme names
///
/// Collecting keeps the first occurrence of each name.
#[derive(Clone, Default)]
pub struct ThemeNames {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl ThemeNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless already present; returns whether it was added
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if !self.seen.insert(name.clone()) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl PartialEq for ThemeNames {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for ThemeNames {}

impl std::fmt::Debug for ThemeNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.names).finish()
    }
}

impl FromIterator<String> for ThemeNames {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut names = Self::new();
        names.extend(iter);
        names
    }
}

impl Extend<String> for ThemeNames {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for name in iter {
            self.push(name);
        }
    }
}

impl<'a> FromIterator<&'a str> for ThemeNames {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl IntoIterator for ThemeNames {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<'a> IntoIterator for &'a ThemeNames {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
