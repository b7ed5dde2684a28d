// src/store/sqlite.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::{now_local, HashRecord, RecordStore, TIMESTAMP_FORMAT};
use crate::errors::{Result, SumwatchError};

/// How long a call waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS file_hash_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    full_path TEXT NOT NULL,
    sha256 TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const CREATE_UNIQUE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_file_hash_log_filename ON file_hash_log(filename)";

/// Record store backed by a SQLite file.
///
/// Holds only the database path. Every operation opens its own connection
/// and drops it before returning, so no handle or lock outlives a call.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    path: PathBuf,
}

impl SqliteRecordStore {
    /// Prepare the database at `path`: create the parent directory, the
    /// `file_hash_log` table and its filename index if they are missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self { path };
        let conn = store.connect()?;

        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| SumwatchError::store("enabling WAL journal", e))?;

        conn.execute_batch(CREATE_TABLE)
            .map_err(|e| SumwatchError::store("creating file_hash_log table", e))?;

        // Tables written by older deployments may already hold duplicate
        // filenames; the pipeline's existence check still applies to them.
        if let Err(e) = conn.execute_batch(CREATE_UNIQUE_INDEX) {
            warn!(
                db = ?store.path,
                error = %e,
                "could not create unique filename index; duplicates are not rejected by the database"
            );
        }

        info!(db = ?store.path, "record store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .map_err(|e| SumwatchError::store(format!("opening {:?}", self.path), e))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| SumwatchError::store("setting busy timeout", e))?;
        Ok(conn)
    }
}

impl RecordStore for SqliteRecordStore {
    fn exists(&self, filename: &str) -> Result<bool> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM file_hash_log WHERE filename = ?1",
                params![filename],
                |row| row.get(0),
            )
            .map_err(|e| SumwatchError::store(format!("looking up {filename:?}"), e))?;
        Ok(count > 0)
    }

    fn insert(&self, filename: &str, full_path: &Path, digest: &str) -> Result<()> {
        let conn = self.connect()?;
        let created_at = now_local().format(TIMESTAMP_FORMAT).to_string();
        conn.execute(
            "INSERT INTO file_hash_log (filename, full_path, sha256, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                filename,
                full_path.to_string_lossy().into_owned(),
                digest,
                created_at
            ],
        )
        .map_err(|e| SumwatchError::store(format!("inserting {filename:?}"), e))?;
        debug!(file = %filename, "record inserted (sqlite)");
        Ok(())
    }

    fn get(&self, filename: &str) -> Result<Option<HashRecord>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT filename, full_path, sha256, created_at FROM file_hash_log
                 WHERE filename = ?1 ORDER BY rowid LIMIT 1",
                params![filename],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| SumwatchError::store(format!("reading {filename:?}"), e))?;

        let Some((filename, full_path, digest, created_at)) = row else {
            return Ok(None);
        };

        let recorded_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
            .map_err(|e| SumwatchError::store(format!("parsing created_at of {filename:?}"), e))?;

        Ok(Some(HashRecord {
            filename,
            full_path,
            digest,
            recorded_at,
        }))
    }
}
