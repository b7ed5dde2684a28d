// src/engine/report.rs

//! User-visible reporting of per-file outcomes.
//!
//! Each outcome yields at most one console line on stdout plus a log record
//! on stderr. Skips and dedups only reach the console in verbose mode.

use tracing::{debug, error, info, warn, Level};

use crate::digest::ALGORITHM;
use crate::engine::{FailureStage, FileOutcome};

/// Console line for `outcome`, or `None` when it should stay quiet.
pub fn console_line(outcome: &FileOutcome, verbose: bool) -> Option<String> {
    match outcome {
        FileOutcome::Recorded { name, digest, .. } => {
            Some(format!("[+] {name} -> {ALGORITHM}: {digest}"))
        }
        FileOutcome::Failed { name, error, .. } => {
            Some(format!("[!] Error processing {name}: {error}"))
        }
        FileOutcome::Diverged {
            name,
            digest,
            error,
        } => Some(format!(
            "[!!] {name} recorded ({ALGORITHM}: {digest}) but sidecar write failed: {error}"
        )),
        FileOutcome::FilteredOut { name, reason } if verbose => {
            Some(format!("[-] {name} skipped: {reason}"))
        }
        FileOutcome::Deduped { name, reason } if verbose => {
            Some(format!("[-] {name} skipped: {reason}"))
        }
        FileOutcome::FilteredOut { .. } | FileOutcome::Deduped { .. } => None,
    }
}

/// Level of the log record emitted for `outcome`.
///
/// Store failures rank with divergence: while the store is unhealthy no
/// file can be marked processed.
pub fn log_level(outcome: &FileOutcome) -> Level {
    match outcome {
        FileOutcome::Recorded { .. } => Level::INFO,
        FileOutcome::FilteredOut { .. } | FileOutcome::Deduped { .. } => Level::DEBUG,
        FileOutcome::Failed {
            stage: FailureStage::Lookup | FailureStage::Store,
            ..
        }
        | FileOutcome::Diverged { .. } => Level::ERROR,
        FileOutcome::Failed { .. } => Level::WARN,
    }
}

/// Emit the log record for `outcome`.
pub fn log_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Recorded {
            name,
            digest,
            sidecar,
        } => {
            info!(file = %name, digest = %digest, sidecar = ?sidecar, "file recorded");
        }
        FileOutcome::FilteredOut { name, reason } => {
            debug!(file = %name, reason = %reason, "event filtered out");
        }
        FileOutcome::Deduped { name, reason } => {
            debug!(file = %name, reason = %reason, "event deduplicated");
        }
        FileOutcome::Failed { name, stage, error } if log_level(outcome) == Level::ERROR => {
            error!(
                file = %name,
                stage = %stage,
                error = %error,
                "record store failure: file not recorded; a later event for it will retry"
            );
        }
        FileOutcome::Failed { name, stage, error } => {
            warn!(file = %name, stage = %stage, error = %error, "failed to process file");
        }
        FileOutcome::Diverged {
            name,
            digest,
            error,
        } => {
            error!(
                file = %name,
                digest = %digest,
                error = %error,
                "store/sidecar divergence: record committed but sidecar missing; file will not be retried"
            );
        }
    }
}

/// Log the outcome and print its console line, if any.
pub fn emit(outcome: &FileOutcome, verbose: bool) {
    log_outcome(outcome);
    if let Some(line) = console_line(outcome, verbose) {
        println!("{line}");
    }
}
