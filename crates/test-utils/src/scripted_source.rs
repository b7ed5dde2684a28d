use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use sumwatch::engine::RuntimeEvent;
use sumwatch::types::FileEvent;

/// How a scripted source ends after delivering its events.
#[derive(Debug, Clone)]
pub enum SourceEnd {
    /// Ask the runtime to shut down cleanly.
    Shutdown,
    /// Report a notification failure.
    Fail(String),
    /// Drop the sender without saying anything.
    Hangup,
}

/// A stand-in notification source that replays a fixed list of events.
pub struct ScriptedSource {
    events: Vec<FileEvent>,
    end: SourceEnd,
}

impl ScriptedSource {
    pub fn new(events: Vec<FileEvent>) -> Self {
        Self {
            events,
            end: SourceEnd::Shutdown,
        }
    }

    pub fn ending_with(mut self, end: SourceEnd) -> Self {
        self.end = end;
        self
    }

    /// Build a channel, spawn the replay task and hand back the receiver
    /// for the runtime.
    pub fn spawn(self) -> (mpsc::Receiver<RuntimeEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move {
            for event in self.events {
                if tx.send(RuntimeEvent::File(event)).await.is_err() {
                    return;
                }
            }
            match self.end {
                SourceEnd::Shutdown => {
                    let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
                }
                SourceEnd::Fail(msg) => {
                    let _ = tx.send(RuntimeEvent::SourceFailed(msg)).await;
                }
                SourceEnd::Hangup => drop(tx),
            }
        });
        (rx, handle)
    }
}
