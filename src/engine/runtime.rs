// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::errors::{Result, SumwatchError};
use crate::types::FileEvent;

use super::pipeline::IngestPipeline;
use super::report;
use super::{FailureStage, FileOutcome, RunStats, RuntimeEvent};

/// Drives the ingestion pipeline in response to `RuntimeEvent`s.
///
/// Events are handled strictly one at a time in arrival order. The
/// pipeline's blocking I/O runs on Tokio's blocking pool, but the loop
/// awaits each file before pulling the next event.
pub struct Runtime {
    pipeline: Arc<IngestPipeline>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    verbose: bool,
    stats: RunStats,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("pipeline", &self.pipeline)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        pipeline: Arc<IngestPipeline>,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        verbose: bool,
    ) -> Self {
        Self {
            pipeline,
            event_rx,
            verbose,
            stats: RunStats::default(),
        }
    }

    /// Main event loop.
    ///
    /// Returns the run's counters on `ShutdownRequested`. Returns
    /// `SourceError` if the source reports a failure or every sender is
    /// dropped without a shutdown request.
    pub async fn run(mut self) -> Result<RunStats> {
        info!(dir = ?self.pipeline.dir(), "sumwatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    error!("notification channel closed unexpectedly");
                    return Err(SumwatchError::SourceError(
                        "notification channel closed unexpectedly".to_string(),
                    ));
                }
            };

            match event {
                RuntimeEvent::File(file_event) => {
                    let outcome = self.process(file_event).await;
                    report::emit(&outcome, self.verbose);
                    self.stats.record(&outcome);
                }
                RuntimeEvent::SourceFailed(msg) => {
                    error!(error = %msg, "notification source failed; stopping");
                    return Err(SumwatchError::SourceError(msg));
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        let stats = self.stats;
        info!(
            recorded = stats.recorded,
            filtered = stats.filtered,
            deduped = stats.deduped,
            failed = stats.failed,
            diverged = stats.diverged,
            "runtime exiting"
        );
        Ok(stats)
    }

    async fn process(&self, event: FileEvent) -> FileOutcome {
        debug!(file = %event.name, kind = %event.kind, "runtime received file event");

        let pipeline = Arc::clone(&self.pipeline);
        let name = event.name.clone();

        match tokio::task::spawn_blocking(move || pipeline.process(&event)).await {
            Ok(outcome) => outcome,
            Err(err) => FileOutcome::Failed {
                name,
                stage: FailureStage::Internal,
                error: err.to_string(),
            },
        }
    }
}
