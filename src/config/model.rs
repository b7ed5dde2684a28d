// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::StoreBackend;

/// Default drop folder watched when nothing else is configured.
pub const DEFAULT_WATCH_DIR: &str = "/var/www/webdav/hash";
/// Default location of the SQLite record store.
pub const DEFAULT_STORE_PATH: &str = "/opt/filewatch/filewatch.db";
/// Default sidecar extension (without the leading dot).
pub const DEFAULT_SIDECAR_EXTENSION: &str = "sha256";

/// Configuration exactly as read from TOML, before validation.
///
/// ```toml
/// [watch]
/// dir = "/var/www/webdav/hash"
///
/// [store]
/// backend = "sqlite"
/// path = "/opt/filewatch/filewatch.db"
///
/// [filter]
/// ignore_prefixes = [".davfs.", "._"]
/// ignore_names = [".DS_Store", "Thumbs.db"]
/// ignore_globs = ["*.part"]
///
/// [sidecar]
/// extension = "sha256"
///
/// [report]
/// verbose = false
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub filter: FilterSection,

    #[serde(default)]
    pub sidecar: SidecarSection,

    #[serde(default)]
    pub report: ReportSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory to watch (non-recursively).
    #[serde(default = "default_watch_dir")]
    pub dir: PathBuf,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WATCH_DIR)
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_watch_dir(),
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file; ignored by the memory backend.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

/// `[filter]` section: names the pipeline never processes.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSection {
    /// Lock / temp-file prefixes left behind by the upload transport.
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,

    /// Exact OS artifact names.
    #[serde(default = "default_ignore_names")]
    pub ignore_names: Vec<String>,

    /// Extra glob patterns matched against the basename.
    #[serde(default)]
    pub ignore_globs: Vec<String>,
}

fn default_ignore_prefixes() -> Vec<String> {
    vec![".davfs.".to_string(), "._".to_string()]
}

fn default_ignore_names() -> Vec<String> {
    vec![".DS_Store".to_string(), "Thumbs.db".to_string()]
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            ignore_prefixes: default_ignore_prefixes(),
            ignore_names: default_ignore_names(),
            ignore_globs: Vec::new(),
        }
    }
}

/// `[sidecar]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SidecarSection {
    /// Extension appended to the original path, with or without a leading dot.
    #[serde(default = "default_sidecar_extension")]
    pub extension: String,
}

fn default_sidecar_extension() -> String {
    DEFAULT_SIDECAR_EXTENSION.to_string()
}

impl Default for SidecarSection {
    fn default() -> Self {
        Self {
            extension: default_sidecar_extension(),
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSection {
    /// Print a console line for skipped and deduplicated events too.
    #[serde(default)]
    pub verbose: bool,
}

/// Validated, immutable configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)`, so every
/// instance has passed validation and carries a normalised sidecar extension.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    store: StoreSection,
    filter: FilterSection,
    sidecar: SidecarSection,
    report: ReportSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        watch: WatchSection,
        store: StoreSection,
        filter: FilterSection,
        sidecar: SidecarSection,
        report: ReportSection,
    ) -> Self {
        Self {
            watch,
            store,
            filter,
            sidecar,
            report,
        }
    }

    pub fn watch_dir(&self) -> &Path {
        &self.watch.dir
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store.backend
    }

    pub fn store_path(&self) -> &Path {
        &self.store.path
    }

    pub fn filter(&self) -> &FilterSection {
        &self.filter
    }

    /// Sidecar extension without a leading dot, e.g. `"sha256"`.
    pub fn sidecar_extension(&self) -> &str {
        &self.sidecar.extension
    }

    pub fn verbose(&self) -> bool {
        self.report.verbose
    }
}
