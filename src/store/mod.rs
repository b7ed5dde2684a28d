// src/store/mod.rs

//! Durable log of processed files.
//!
//! The store is the authority on "already processed": a filename appears at
//! most once, records are never updated, and nothing here deletes them.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::types::StoreBackend;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Timestamp layout used for `recorded_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    pub filename: String,
    pub full_path: String,
    /// Lowercase hex SHA-256.
    pub digest: String,
    /// Local time of insertion.
    pub recorded_at: NaiveDateTime,
}

/// Append-only record storage keyed by filename.
pub trait RecordStore: Send + Sync + Debug {
    /// True iff a record for `filename` has been committed.
    fn exists(&self, filename: &str) -> Result<bool>;

    /// Append a record stamped with the current local time.
    fn insert(&self, filename: &str, full_path: &Path, digest: &str) -> Result<()>;

    /// Fetch the record for `filename`, if any.
    fn get(&self, filename: &str) -> Result<Option<HashRecord>>;
}

/// Open the store selected by `[store].backend`.
pub fn open_store(cfg: &ConfigFile) -> Result<Arc<dyn RecordStore>> {
    match cfg.store_backend() {
        StoreBackend::Sqlite => Ok(Arc::new(SqliteRecordStore::open(cfg.store_path())?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryRecordStore::new())),
    }
}

pub(crate) fn now_local() -> NaiveDateTime {
    // Second precision, matching what the database column can round-trip.
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
