#![allow(dead_code)]

use std::path::Path;

use sumwatch::config::{ConfigFile, RawConfigFile};
use sumwatch::types::StoreBackend;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults with the memory backend selected, so a
/// test only has to point it at a directory.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.store.backend = StoreBackend::Memory;
        Self { config }
    }

    pub fn watch_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.watch.dir = dir.as_ref().to_path_buf();
        self
    }

    /// Select the SQLite backend at `path`.
    pub fn sqlite_store(mut self, path: impl AsRef<Path>) -> Self {
        self.config.store.backend = StoreBackend::Sqlite;
        self.config.store.path = path.as_ref().to_path_buf();
        self
    }

    pub fn sidecar_extension(mut self, ext: &str) -> Self {
        self.config.sidecar.extension = ext.to_string();
        self
    }

    pub fn ignore_prefix(mut self, prefix: &str) -> Self {
        self.config.filter.ignore_prefixes.push(prefix.to_string());
        self
    }

    pub fn ignore_name(mut self, name: &str) -> Self {
        self.config.filter.ignore_names.push(name.to_string());
        self
    }

    pub fn ignore_glob(mut self, pattern: &str) -> Self {
        self.config.filter.ignore_globs.push(pattern.to_string());
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.config.report.verbose = val;
        self
    }

    /// The raw config, for tests that exercise validation failures.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
