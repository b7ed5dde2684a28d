// src/engine/mod.rs

//! Ingestion engine.
//!
//! - [`pipeline`] holds the synchronous per-file state machine: filter,
//!   dedup, hash, record, write sidecar. It turns every event into a
//!   [`FileOutcome`] and never returns an error.
//! - [`runtime`] is the async shell: it pulls [`RuntimeEvent`]s off a
//!   channel one at a time, runs the pipeline on the blocking pool, and
//!   stops on shutdown or when the notification source fails.
//! - [`report`] renders outcomes as console lines and log records.

use std::fmt;
use std::path::PathBuf;

use crate::types::FileEvent;
use crate::watch::filter::SkipReason;

pub mod pipeline;
pub mod report;
pub mod runtime;

pub use pipeline::IngestPipeline;
pub use runtime::Runtime;

/// Events flowing into the runtime from the notification source.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A file in the watched directory was written or renamed.
    File(FileEvent),
    /// The notification source failed; the runtime stops with an error.
    SourceFailed(String),
    /// Graceful shutdown requested (Ctrl-C, or end of a one-shot sweep).
    ShutdownRequested,
}

/// Why an event was dropped as already processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupReason {
    /// The record store already holds this filename.
    InStore,
    /// A sidecar file already sits next to the file.
    SidecarPresent,
}

impl fmt::Display for DedupReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupReason::InStore => f.write_str("already recorded"),
            DedupReason::SidecarPresent => f.write_str("sidecar already present"),
        }
    }
}

/// Step at which processing a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The store could not answer the existence check.
    Lookup,
    /// The file could not be opened or read to the end.
    Read,
    /// The record could not be inserted.
    Store,
    /// The blocking worker running the pipeline panicked.
    Internal,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Lookup => f.write_str("lookup"),
            FailureStage::Read => f.write_str("read"),
            FailureStage::Store => f.write_str("store"),
            FailureStage::Internal => f.write_str("internal"),
        }
    }
}

/// Terminal state of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    FilteredOut {
        name: String,
        reason: SkipReason,
    },
    Deduped {
        name: String,
        reason: DedupReason,
    },
    /// Record inserted and sidecar written.
    Recorded {
        name: String,
        digest: String,
        sidecar: PathBuf,
    },
    /// Nothing was recorded; a later event for the same name may retry.
    Failed {
        name: String,
        stage: FailureStage,
        error: String,
    },
    /// The record was inserted but the sidecar write failed. The file now
    /// counts as processed and will not be retried.
    Diverged {
        name: String,
        digest: String,
        error: String,
    },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::FilteredOut { name, .. }
            | FileOutcome::Deduped { name, .. }
            | FileOutcome::Recorded { name, .. }
            | FileOutcome::Failed { name, .. }
            | FileOutcome::Diverged { name, .. } => name,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, FileOutcome::Recorded { .. })
    }
}

/// Per-run counters, logged when the runtime exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub recorded: usize,
    pub filtered: usize,
    pub deduped: usize,
    pub failed: usize,
    pub diverged: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::FilteredOut { .. } => self.filtered += 1,
            FileOutcome::Deduped { .. } => self.deduped += 1,
            FileOutcome::Recorded { .. } => self.recorded += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
            FileOutcome::Diverged { .. } => self.diverged += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.recorded + self.filtered + self.deduped + self.failed + self.diverged
    }
}
