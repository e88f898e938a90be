//! Directory-backed theme store with a TTL cache
//!
//! The root directory holds one subdirectory per theme; every file below a
//! theme directory belongs to that theme. Directory state is cached and
//! rescanned at most once per TTL. Concurrent callers that find the cache
//! stale share a single rescan (single-flight): they queue on the refresh
//! gate, and whoever gets in after the rescan finished sees a fresh snapshot
//! and returns it instead of scanning again.
//!
//! A failed rescan is reported through the [`ErrorSink`] and the previous
//! snapshot keeps being served. The same holds per theme: a theme directory
//! that exists but cannot be read keeps its previous file set.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant, SystemTime},
};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    error::{ErrorSink, StoreError, StoreResult},
    store::ThemeStore,
    types::{is_valid_theme_name, Theme, ThemeFile, ThemeNames},
};

/// Relative path (`/`-separated) to absolute location
type FileSet = BTreeMap<String, PathBuf>;

/// Reads one theme directory; `Ok(None)` means the directory is gone
type ThemeScanner = fn(&Path) -> io::Result<Option<FileSet>>;

/// Result of a root scan that could list the root
struct ScanOutcome {
    themes: BTreeMap<String, FileSet>,
    /// Non-fatal problems; affected themes were carried over
    errors: Vec<StoreError>,
}

/// One immutable view of the root directory
#[derive(Debug, Default)]
struct Snapshot {
    themes: Arc<BTreeMap<String, FileSet>>,
    /// When the cache was last (re)validated, successfully or not
    checked_at: Option<Instant>,
    /// Wall-clock time of the last successful scan
    scanned_at: Option<SystemTime>,
}

impl Snapshot {
    fn scanned(themes: BTreeMap<String, FileSet>) -> Self {
        Self {
            themes: Arc::new(themes),
            checked_at: Some(Instant::now()),
            scanned_at: Some(SystemTime::now()),
        }
    }

    /// Same contents, revalidated now
    fn retained(&self) -> Self {
        Self {
            themes: Arc::clone(&self.themes),
            checked_at: Some(Instant::now()),
            scanned_at: self.scanned_at,
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        match self.checked_at {
            Some(checked_at) => checked_at.elapsed() >= ttl,
            None => true,
        }
    }
}

/// Counters describing cache activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStoreStats {
    /// Completed directory scans, including failed ones
    pub scans: u64,
    /// Scans that failed and left the previous snapshot in place
    pub failures: u64,
    /// Themes in the current snapshot
    pub themes: usize,
    /// Wall-clock time of the last successful scan
    pub last_scan: Option<SystemTime>,
}

/// Theme store over one directory tree
pub struct FileStore {
    label: String,
    root: PathBuf,
    ttl: Duration,
    sink: ErrorSink,
    snapshot: RwLock<Arc<Snapshot>>,
    refresh_gate: Mutex<()>,
    scanner: ThemeScanner,
    scans: AtomicU64,
    failures: AtomicU64,
}

impl FileStore {
    pub const LABEL: &'static str = "filesystem";

    /// Create a store over `root`, creating the directory if missing
    ///
    /// Fails when the root cannot be created or read. No scan happens until
    /// the first query.
    pub fn new(root: impl Into<PathBuf>, ttl: Duration, sink: ErrorSink) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::InvalidRoot {
            path: root.clone(),
            source,
        })?;
        fs::read_dir(&root).map_err(|source| StoreError::InvalidRoot {
            path: root.clone(),
            source,
        })?;
        debug!("Theme store rooted at {} (ttl {:?})", root.display(), ttl);

        Ok(Self {
            label: Self::LABEL.to_string(),
            root,
            ttl,
            sink,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            refresh_gate: Mutex::new(()),
            scanner: scan_theme,
            scans: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        })
    }

    /// Replace the origin label reported on resolved themes
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[cfg(test)]
    fn with_scanner(mut self, scanner: ThemeScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> FileStoreStats {
        let snapshot = self.current();
        FileStoreStats {
            scans: self.scans.load(Ordering::SeqCst),
            failures: self.failures.load(Ordering::SeqCst),
            themes: snapshot.themes.len(),
            last_scan: snapshot.scanned_at,
        }
    }

    /// Rescan now regardless of the TTL
    pub async fn refresh(&self) {
        let _gate = self.refresh_gate.lock().await;
        let previous = self.current();
        self.rescan(previous).await;
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Current snapshot, rescanning first if it has expired
    async fn fresh_snapshot(&self) -> Arc<Snapshot> {
        let snapshot = self.current();
        if !snapshot.is_stale(self.ttl) {
            return snapshot;
        }

        let _gate = self.refresh_gate.lock().await;
        // Another caller may have finished a rescan while we waited
        let snapshot = self.current();
        if !snapshot.is_stale(self.ttl) {
            return snapshot;
        }
        self.rescan(snapshot).await
    }

    /// Must be called with the refresh gate held
    async fn rescan(&self, previous: Arc<Snapshot>) -> Arc<Snapshot> {
        let root = self.root.clone();
        let scanner = self.scanner;
        let known = Arc::clone(&previous.themes);
        let result = tokio::task::spawn_blocking(move || scan_root(&root, &known, scanner))
            .await
            .unwrap_or_else(|e| Err(StoreError::Join(e.to_string())));
        self.scans.fetch_add(1, Ordering::SeqCst);

        let next = match result {
            Ok(outcome) => {
                for err in &outcome.errors {
                    (self.sink)(err);
                }
                debug!(
                    "Scanned {}: {} theme(s), {} unreadable",
                    self.root.display(),
                    outcome.themes.len(),
                    outcome.errors.len()
                );
                Arc::new(Snapshot::scanned(outcome.themes))
            }
            Err(err) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                (self.sink)(&err);
                Arc::new(previous.retained())
            }
        };

        *self.snapshot.write() = Arc::clone(&next);
        next
    }

    fn build_theme(&self, name: &str, files: &FileSet, snapshot: &Snapshot) -> Theme {
        let mut theme = Theme::new(name, self.label.as_str());
        theme.refreshed_at = snapshot.scanned_at;
        for (relative, location) in files {
            theme.files.insert(
                relative.clone(),
                ThemeFile::on_disk(relative.clone(), location.clone()),
            );
        }
        theme
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("label", &self.label)
            .field("root", &self.root)
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Enumerate theme directories directly under `root`
///
/// Themes that cannot be read this time keep their file set from `known`.
/// Every entry below the root is part of a theme, dot-files included.
fn scan_root(
    root: &Path,
    known: &BTreeMap<String, FileSet>,
    scanner: ThemeScanner,
) -> StoreResult<ScanOutcome> {
    let entries = fs::read_dir(root).map_err(|source| StoreError::Scan {
        path: root.to_path_buf(),
        source,
    })?;

    let mut themes = BTreeMap::new();
    let mut errors = Vec::new();
    let mut listing_complete = true;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                listing_complete = false;
                errors.push(StoreError::Scan {
                    path: root.to_path_buf(),
                    source,
                });
                continue;
            }
        };
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !is_valid_theme_name(&name) {
            continue;
        }
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        match scanner(&dir) {
            Ok(Some(files)) => {
                themes.insert(name, files);
            }
            // Removed mid-scan
            Ok(None) => {}
            Err(source) => {
                if let Some(files) = known.get(&name) {
                    themes.insert(name, files.clone());
                }
                errors.push(StoreError::Scan { path: dir, source });
            }
        }
    }

    // Entries the listing could not name may be any known theme
    if !listing_complete {
        for (name, files) in known {
            themes.entry(name.clone()).or_insert_with(|| files.clone());
        }
    }
    Ok(ScanOutcome { themes, errors })
}

/// Recursively collect the files of one theme directory
///
/// Only a theme directory that no longer exists yields `Ok(None)`. Failing to
/// open the directory or any subdirectory is an error; entries that disappear
/// during the walk are skipped.
fn scan_theme(dir: &Path) -> io::Result<Option<FileSet>> {
    let mut files = FileSet::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.loop_ancestor().is_some() => {
                debug!("Skipping symlink loop in {}: {}", dir.display(), e);
                continue;
            }
            Err(e) if e.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound) => {
                if e.depth() == 0 {
                    debug!("Theme directory {} vanished", dir.display());
                    return Ok(None);
                }
                // Removed mid-walk, or a dangling link
                continue;
            }
            Err(e) => {
                let message = e.to_string();
                return Err(e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message)));
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.insert(relative, entry.path().to_path_buf());
    }
    Ok(Some(files))
}

#[async_trait]
impl ThemeStore for FileStore {
    fn label(&self) -> &str {
        &self.label
    }

    async fn exists(&self, name: &str) -> bool {
        if !is_valid_theme_name(name) {
            return false;
        }
        self.fresh_snapshot().await.themes.contains_key(name)
    }

    async fn get(&self, name: &str) -> Option<Theme> {
        if !is_valid_theme_name(name) {
            return None;
        }
        let snapshot = self.fresh_snapshot().await;
        let files = snapshot.themes.get(name)?;
        Some(self.build_theme(name, files, &snapshot))
    }

    async fn list(&self) -> StoreResult<ThemeNames> {
        let snapshot = self.fresh_snapshot().await;
        Ok(snapshot.themes.keys().cloned().collect())
    }
}
