//! Themes compiled into the binary
//!
//! Each subdirectory of `defaults/` is embedded as one theme. Lookups are pure
//! reads of the embedded tree: no I/O, never stale, never failing.

use std::path::Path;

use async_trait::async_trait;
use include_dir::{include_dir, Dir, DirEntry};

use crate::{
    error::StoreResult,
    store::ThemeStore,
    types::{is_valid_theme_name, Theme, ThemeFile, ThemeNames},
};

static DEFAULT_THEMES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/defaults");

/// Fallback store of built-in themes
#[derive(Debug, Clone, Copy)]
pub struct DefaultStore {
    themes: &'static Dir<'static>,
}

impl DefaultStore {
    pub const LABEL: &'static str = "default";

    /// Store over the themes shipped with the crate
    pub fn new() -> Self {
        Self {
            themes: &DEFAULT_THEMES,
        }
    }

    /// Store over another embedded tree (one subdirectory per theme)
    pub fn from_dir(themes: &'static Dir<'static>) -> Self {
        Self { themes }
    }

    fn theme_dir(&self, name: &str) -> Option<&'static Dir<'static>> {
        if !is_valid_theme_name(name) {
            return None;
        }
        let themes: &'static Dir<'static> = self.themes;
        themes.get_dir(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .themes
            .dirs()
            .filter_map(|dir| dir.path().file_name())
            .filter_map(|name| name.to_str())
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

impl Default for DefaultStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect every file below `dir`, keyed relative to `theme_root`
fn collect_files(dir: &'static Dir<'static>, theme_root: &Path, theme: &mut Theme) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(child) => collect_files(child, theme_root, theme),
            DirEntry::File(file) => {
                let Ok(relative) = file.path().strip_prefix(theme_root) else {
                    continue;
                };
                let relative = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                theme
                    .files
                    .insert(relative.clone(), ThemeFile::embedded(relative, file.contents()));
            }
        }
    }
}

#[async_trait]
impl ThemeStore for DefaultStore {
    fn label(&self) -> &str {
        Self::LABEL
    }

    async fn exists(&self, name: &str) -> bool {
        self.theme_dir(name).is_some()
    }

    async fn get(&self, name: &str) -> Option<Theme> {
        let dir = self.theme_dir(name)?;
        let mut theme = Theme::new(name, Self::LABEL);
        collect_files(dir, dir.path(), &mut theme);
        Some(theme)
    }

    async fn list(&self) -> StoreResult<ThemeNames> {
        Ok(self.names().into_iter().collect())
    }
}
