// src/engine/pipeline.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::digest::digest_file;
use crate::engine::{DedupReason, FailureStage, FileOutcome};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::sidecar::SidecarWriter;
use crate::store::RecordStore;
use crate::types::FileEvent;
use crate::watch::filter::{Classification, EventFilter, SkipReason};

/// Per-file ingestion: filter → dedup → hash → record → sidecar.
///
/// The store handle is passed in at construction; the pipeline keeps no
/// other state between events, so processing the same name twice is safe.
#[derive(Debug)]
pub struct IngestPipeline {
    dir: PathBuf,
    filter: EventFilter,
    store: Arc<dyn RecordStore>,
    fs: Arc<dyn FileSystem>,
    sidecar: SidecarWriter,
}

impl IngestPipeline {
    pub fn new(
        dir: impl Into<PathBuf>,
        filter: EventFilter,
        store: Arc<dyn RecordStore>,
        fs: Arc<dyn FileSystem>,
        sidecar_extension: &str,
    ) -> Self {
        let sidecar = SidecarWriter::new(sidecar_extension, Arc::clone(&fs));
        Self {
            dir: dir.into(),
            filter,
            store,
            fs,
            sidecar,
        }
    }

    pub fn from_config(
        cfg: &ConfigFile,
        store: Arc<dyn RecordStore>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let filter = EventFilter::from_config(cfg)?;
        Ok(Self::new(
            cfg.watch_dir(),
            filter,
            store,
            fs,
            cfg.sidecar_extension(),
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run one event through every step and report where it ended.
    pub fn process(&self, event: &FileEvent) -> FileOutcome {
        let name = event.name.as_str();
        debug!(file = %name, kind = %event.kind, "processing event");

        if let Classification::Skip(reason) = self.filter.classify(name) {
            return FileOutcome::FilteredOut {
                name: name.to_string(),
                reason,
            };
        }

        match self.store.exists(name) {
            Ok(true) => {
                return FileOutcome::Deduped {
                    name: name.to_string(),
                    reason: DedupReason::InStore,
                };
            }
            Ok(false) => {}
            Err(e) => {
                return FileOutcome::Failed {
                    name: name.to_string(),
                    stage: FailureStage::Lookup,
                    error: e.to_string(),
                };
            }
        }

        let full_path = self.dir.join(name);

        // Covers a crash between the sidecar write of an earlier run and a
        // store that lost or never saw the record.
        if self.fs.exists(&self.sidecar.path_for(&full_path)) {
            return FileOutcome::Deduped {
                name: name.to_string(),
                reason: DedupReason::SidecarPresent,
            };
        }

        if !self.fs.is_file(&full_path) {
            return FileOutcome::FilteredOut {
                name: name.to_string(),
                reason: SkipReason::NotARegularFile,
            };
        }

        let digest = match digest_file(self.fs.as_ref(), &full_path) {
            Ok(d) => d,
            Err(e) => {
                return FileOutcome::Failed {
                    name: name.to_string(),
                    stage: FailureStage::Read,
                    error: e.to_string(),
                };
            }
        };

        if let Err(e) = self.store.insert(name, &full_path, &digest) {
            return FileOutcome::Failed {
                name: name.to_string(),
                stage: FailureStage::Store,
                error: e.to_string(),
            };
        }

        match self.sidecar.write(&full_path, &digest) {
            Ok(sidecar) => FileOutcome::Recorded {
                name: name.to_string(),
                digest,
                sidecar,
            },
            Err(e) => FileOutcome::Diverged {
                name: name.to_string(),
                digest,
                error: e.to_string(),
            },
        }
    }
}
