// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Config, Event, EventKind as NotifyKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::{Result, SumwatchError};
use crate::types::{EventKind, FileEvent};
use crate::watch::path_utils::basename_in_dir;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    dir: PathBuf,
    _inner: RecommendedWatcher,
}

impl WatcherHandle {
    /// The (canonicalised) directory being watched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// Subscribe to write-complete and rename notifications for `dir`
/// (non-recursive) and forward them to the runtime as
/// `RuntimeEvent::File`.
///
/// Failure to set up the subscription is a `SourceError`. Once running, a
/// watch error or the notify side hanging up is forwarded as
/// `RuntimeEvent::SourceFailed`.
pub fn spawn_watcher(
    dir: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let dir = dir.into();
    // Canonicalize once so event paths compare equal to the root.
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(err) = event_tx.send(res) {
                // We can't log via tracing here reliably, so fall back to stderr.
                eprintln!("sumwatch: failed to forward notify event: {err}");
            }
        },
        Config::default(),
    )
    .map_err(|e| SumwatchError::SourceError(format!("creating file watcher: {e}")))?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| SumwatchError::SourceError(format!("watching {:?}: {e}", dir)))?;

    info!("file watcher started on {:?}", dir);

    let async_dir = dir.clone();
    tokio::spawn(async move {
        while let Some(res) = event_rx.recv().await {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    let _ = runtime_tx
                        .send(RuntimeEvent::SourceFailed(format!("file watch error: {err}")))
                        .await;
                    return;
                }
            };

            debug!(?event, "received notify event");

            for file_event in translate_event(&async_dir, &event) {
                if runtime_tx.send(RuntimeEvent::File(file_event)).await.is_err() {
                    debug!("runtime channel closed; watcher forwarding stopped");
                    return;
                }
            }
        }

        // The notify callback (and with it the sender) was dropped.
        let _ = runtime_tx
            .send(RuntimeEvent::SourceFailed(
                "file watcher stopped delivering events".to_string(),
            ))
            .await;
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        dir,
        _inner: watcher,
    })
}

/// Map one notify event to the file events the pipeline cares about.
///
/// - close-after-write → `WriteComplete`
/// - rename into the directory (`To`, `Any`) → `Rename`
/// - paired rename (`Both`) → `Rename` for the destination only
///
/// Everything else, including the source side of a rename, is dropped, as
/// are paths outside `dir`.
pub fn translate_event(dir: &Path, event: &Event) -> Vec<FileEvent> {
    let (kind, paths): (EventKind, &[PathBuf]) = match event.kind {
        NotifyKind::Access(AccessKind::Close(AccessMode::Write)) => {
            (EventKind::WriteComplete, &event.paths[..])
        }
        NotifyKind::Modify(ModifyKind::Name(RenameMode::To))
        | NotifyKind::Modify(ModifyKind::Name(RenameMode::Any)) => {
            (EventKind::Rename, &event.paths[..])
        }
        NotifyKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let last = event.paths.len().saturating_sub(1);
            (EventKind::Rename, &event.paths[last..])
        }
        _ => return Vec::new(),
    };

    paths
        .iter()
        .filter_map(|path| match basename_in_dir(dir, path) {
            Some(name) => Some(FileEvent::new(name, kind)),
            None => {
                warn!(?path, ?dir, "ignoring event path outside the watched directory");
                None
            }
        })
        .collect()
}
