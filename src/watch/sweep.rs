// src/watch/sweep.rs

//! One-shot listing of the watch directory (`--once` mode).

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::FileEvent;

/// A `WriteComplete` event for every regular file directly in `dir`,
/// sorted by name so runs are reproducible.
pub fn existing_file_events(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<FileEvent>> {
    let mut names: Vec<String> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|p| fs.is_file(p))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    names.sort();

    info!(dir = ?dir, files = names.len(), "sweeping existing files");
    Ok(names.into_iter().map(FileEvent::write_complete).collect())
}

/// Send `events` to the runtime followed by a shutdown request.
pub async fn feed(events: Vec<FileEvent>, runtime_tx: mpsc::Sender<RuntimeEvent>) {
    for event in events {
        if runtime_tx.send(RuntimeEvent::File(event)).await.is_err() {
            debug!("runtime stopped before sweep finished");
            return;
        }
    }
    let _ = runtime_tx.send(RuntimeEvent::ShutdownRequested).await;
}
