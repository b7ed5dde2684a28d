// src/store/memory.rs

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;

use super::{now_local, HashRecord, RecordStore};
use crate::errors::{Result, SumwatchError};

/// Stores records in memory only (lost on restart).
///
/// Inserts can be made to fail on demand to exercise the pipeline's
/// store-failure path.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<BTreeMap<String, HashRecord>>,
    fail_inserts: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `insert` fail (or succeed again).
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, HashRecord>>> {
        self.records
            .lock()
            .map_err(|_| SumwatchError::store("memory store", "record map mutex poisoned"))
    }
}

impl RecordStore for MemoryRecordStore {
    fn exists(&self, filename: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(filename))
    }

    fn insert(&self, filename: &str, full_path: &Path, digest: &str) -> Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(SumwatchError::store(
                format!("inserting {filename:?}"),
                io::Error::other("database or disk is full"),
            ));
        }

        let mut records = self.lock()?;
        if records.contains_key(filename) {
            return Err(SumwatchError::store(
                format!("inserting {filename:?}"),
                "a record for this filename already exists",
            ));
        }
        records.insert(
            filename.to_string(),
            HashRecord {
                filename: filename.to_string(),
                full_path: full_path.to_string_lossy().into_owned(),
                digest: digest.to_string(),
                recorded_at: now_local(),
            },
        );
        debug!(file = %filename, "record inserted (memory)");
        Ok(())
    }

    fn get(&self, filename: &str) -> Result<Option<HashRecord>> {
        Ok(self.lock()?.get(filename).cloned())
    }
}
