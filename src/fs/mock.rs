// src/fs/mock.rs

//! In-memory [`FileSystem`] with fault injection, for pipeline tests.

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    /// A file that opens fine but errors after yielding `readable` bytes.
    Truncated { readable: Vec<u8> },
    Dir,
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    fail_open: HashSet<PathBuf>,
    fail_write: HashSet<PathBuf>,
    write_attempts: HashMap<PathBuf, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.entries.insert(path.as_ref().to_path_buf(), MockEntry::Dir);
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state
            .entries
            .insert(path.as_ref().to_path_buf(), MockEntry::File(content.into()));
    }

    /// Add a file whose reads fail part-way through.
    pub fn add_truncated_file(&self, path: impl AsRef<Path>, readable: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state.entries.insert(
            path.as_ref().to_path_buf(),
            MockEntry::Truncated {
                readable: readable.into(),
            },
        );
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.entries.remove(path.as_ref());
    }

    /// Make `open_read` fail for `path` while `is_file` keeps reporting true,
    /// as when a file disappears between the type check and the read.
    pub fn fail_open(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.fail_open.insert(path.as_ref().to_path_buf());
    }

    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.fail_write.insert(path.as_ref().to_path_buf());
    }

    /// Number of times `write` was called for `path`, including failed calls.
    pub fn write_attempts(&self, path: impl AsRef<Path>) -> usize {
        let state = self.state.lock().unwrap();
        state
            .write_attempts
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path.as_ref()) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }
}

/// Reader that yields its buffer and then reports an I/O error.
struct TruncatedReader {
    inner: Cursor<Vec<u8>>,
}

impl Read for TruncatedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "simulated read failure",
            ));
        }
        Ok(n)
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let state = self.state.lock().unwrap();
        if state.fail_open.contains(path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        match state.entries.get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Truncated { readable }) => Ok(Box::new(TruncatedReader {
                inner: Cursor::new(readable.clone()),
            })),
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        *state.write_attempts.entry(path.to_path_buf()).or_insert(0) += 1;
        if state.fail_write.contains(path) {
            return Err(anyhow!("No space left on device: {:?}", path));
        }
        state
            .entries
            .insert(path.to_path_buf(), MockEntry::File(contents.to_vec()));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(
            state.entries.get(path),
            Some(MockEntry::File(_)) | Some(MockEntry::Truncated { .. })
        )
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::Dir) => Ok(state
                .entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
