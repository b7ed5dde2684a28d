// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface used by the digest engine, the sidecar
/// writer and the pipeline's existence checks.
pub trait FileSystem: Send + Sync + Debug {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    /// Create or truncate `path` and write `contents` to it.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    /// True only for regular files (symlinks are followed).
    fn is_file(&self, path: &Path) -> bool;

    /// Return the entries of a directory as full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Backed by `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        fs::File::open(path)
            .map(|f| Box::new(f) as Box<dyn Read + Send>)
            .with_context(|| format!("opening {:?} for reading", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        // Parent is the watched directory and must already exist.
        let mut file =
            fs::File::create(path).with_context(|| format!("creating {:?}", path))?;
        file.write_all(contents)
            .and_then(|_| file.flush())
            .with_context(|| format!("writing {:?}", path))
    }

    /// Follows symlinks: a dangling link does not exist.
    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .with_context(|| format!("listing {:?}", path))?
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("reading entry of {:?}", path))
            })
            .collect()
    }
}
