// src/config/validate.rs

use std::path::{Component, Path, PathBuf};

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile, SidecarSection};
use crate::errors::{Result, SumwatchError};
use crate::types::StoreBackend;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SumwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let extension = normalize_extension(&raw.sidecar.extension);
        Ok(ConfigFile::new_unchecked(
            raw.watch,
            raw.store,
            raw.filter,
            SidecarSection { extension },
            raw.report,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch(cfg)?;
    validate_store(cfg)?;
    validate_sidecar(cfg)?;
    validate_filter(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.dir.as_os_str().is_empty() {
        return Err(SumwatchError::ConfigError(
            "[watch].dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_store(cfg: &RawConfigFile) -> Result<()> {
    if cfg.store.backend == StoreBackend::Sqlite && cfg.store.path.as_os_str().is_empty() {
        return Err(SumwatchError::ConfigError(
            "[store].path must not be empty for the sqlite backend".to_string(),
        ));
    }
    // The database and its WAL files would otherwise show up as events.
    if cfg.store.backend == StoreBackend::Sqlite
        && resolve_dir(store_parent(&cfg.store.path)) == resolve_dir(&cfg.watch.dir)
    {
        return Err(SumwatchError::ConfigError(format!(
            "[store].path {:?} must not live inside the watched directory",
            cfg.store.path
        )));
    }
    Ok(())
}

fn validate_sidecar(cfg: &RawConfigFile) -> Result<()> {
    let ext = normalize_extension(&cfg.sidecar.extension);
    if ext.is_empty() {
        return Err(SumwatchError::ConfigError(
            "[sidecar].extension must not be empty".to_string(),
        ));
    }
    if ext.contains(['/', '\\']) || ext.starts_with('.') {
        return Err(SumwatchError::ConfigError(format!(
            "[sidecar].extension must be a plain extension like \"sha256\" (got {:?})",
            cfg.sidecar.extension
        )));
    }
    Ok(())
}

fn validate_filter(cfg: &RawConfigFile) -> Result<()> {
    if cfg.filter.ignore_prefixes.iter().any(|p| p.is_empty()) {
        return Err(SumwatchError::ConfigError(
            "[filter].ignore_prefixes must not contain an empty prefix (it would skip every file)"
                .to_string(),
        ));
    }
    for pattern in cfg.filter.ignore_globs.iter() {
        if let Err(e) = Glob::new(pattern) {
            return Err(SumwatchError::ConfigError(format!(
                "[filter].ignore_globs has invalid pattern {:?}: {}",
                pattern, e
            )));
        }
    }
    Ok(())
}

/// Strip surrounding whitespace and one leading dot.
fn normalize_extension(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('.').unwrap_or(trimmed).to_string()
}

/// Directory holding the store file; a bare file name lives in `.`.
fn store_parent(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Comparable form of `dir`: canonical when it exists, otherwise made
/// absolute and folded lexically (`.` dropped, `..` popped).
fn resolve_dir(dir: &Path) -> PathBuf {
    if let Ok(canon) = dir.canonicalize() {
        return canon;
    }

    let absolute = if dir.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.to_path_buf())
    } else {
        dir.to_path_buf()
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
