// src/sidecar.rs

//! Companion checksum files written next to each processed file.
//!
//! Format is the one `sha256sum -c` understands:
//!
//! ```text
//! <hex digest>  <basename>
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, SumwatchError};
use crate::fs::FileSystem;

/// `<path>.<extension>`; the extension is appended, never substituted.
pub fn sidecar_path(path: &Path, extension: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(".");
    os.push(extension);
    PathBuf::from(os)
}

/// Render the single line stored in a sidecar file.
pub fn render_line(digest: &str, filename: &str) -> String {
    format!("{digest}  {filename}\n")
}

/// Parsed content of a sidecar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarEntry {
    pub digest: String,
    pub filename: String,
}

impl SidecarEntry {
    /// Parse the first line of a sidecar file. Returns `None` if it is not
    /// `<digest>  <filename>`.
    pub fn parse(content: &str) -> Option<Self> {
        let line = content.lines().next()?;
        let (digest, filename) = line.split_once("  ")?;
        if digest.is_empty() || filename.is_empty() {
            return None;
        }
        if !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self {
            digest: digest.to_string(),
            filename: filename.to_string(),
        })
    }
}

/// Writes sidecar files through the [`FileSystem`] abstraction.
#[derive(Debug, Clone)]
pub struct SidecarWriter {
    extension: String,
    fs: Arc<dyn FileSystem>,
}

impl SidecarWriter {
    pub fn new(extension: impl Into<String>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            extension: extension.into(),
            fs,
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Where the sidecar for `path` lives.
    pub fn path_for(&self, path: &Path) -> PathBuf {
        sidecar_path(path, &self.extension)
    }

    /// Write the sidecar for `path` and return its location.
    ///
    /// The write is a plain create-and-write; a crash part-way can leave a
    /// truncated sidecar behind.
    pub fn write(&self, path: &Path, digest: &str) -> Result<PathBuf> {
        let target = self.path_for(path);
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SumwatchError::write(target.clone(), format!("{:?} has no file name", path))
            })?;

        self.fs
            .write(&target, render_line(digest, &filename).as_bytes())
            .map_err(|e| SumwatchError::write(target.clone(), format!("{e:#}")))?;

        debug!(sidecar = ?target, "sidecar file written");
        Ok(target)
    }
}
