use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Kind of filesystem notification that produced a [`FileEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A file opened for writing was closed.
    WriteComplete,
    /// A file was renamed (or moved) into the watched directory.
    Rename,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::WriteComplete => f.write_str("write-complete"),
            EventKind::Rename => f.write_str("rename"),
        }
    }
}

/// A single notification about a file in the watched directory.
///
/// `name` is always a basename; the pipeline joins it onto the watch
/// directory itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub name: String,
    pub kind: EventKind,
}

impl FileEvent {
    pub fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn write_complete(name: impl Into<String>) -> Self {
        Self::new(name, EventKind::WriteComplete)
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self::new(name, EventKind::Rename)
    }
}

/// Backing medium for the record store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite database file (durable across restarts).
    #[default]
    Sqlite,
    /// Records kept in memory only (lost on restart).
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "invalid store backend: {other} (expected \"sqlite\" or \"memory\")"
            )),
        }
    }
}
