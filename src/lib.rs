// src/lib.rs

pub mod cli;
pub mod config;
pub mod digest;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod sidecar;
pub mod store;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{load_raw_or_default, ConfigFile, RawConfigFile};
use crate::engine::{IngestPipeline, Runtime, RuntimeEvent};
use crate::fs::{FileSystem, RealFileSystem};
use crate::store::open_store;

/// Run sumwatch with the given arguments until shutdown.
///
/// Resolves the config, opens the record store, and feeds the pipeline from
/// either the live watcher (stopped by Ctrl-C) or a one-shot sweep of the
/// directory (`--once`).
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_raw_or_default(args.config.as_deref())?;
    apply_cli_overrides(&mut raw, &args);
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let store = open_store(&cfg)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let pipeline = Arc::new(IngestPipeline::from_config(&cfg, store, Arc::clone(&fs))?);

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Kept alive until `run` returns; dropping it stops notifications.
    let _watcher_handle = if args.once {
        let events = watch::sweep::existing_file_events(fs.as_ref(), cfg.watch_dir())?;
        tokio::spawn(watch::sweep::feed(events, rt_tx.clone()));
        None
    } else {
        let handle = watch::spawn_watcher(cfg.watch_dir(), rt_tx.clone())?;

        let tx = rt_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupt received");
                    let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
                }
                Err(e) => warn!(error = %e, "cannot listen for Ctrl-C; stop the process with SIGTERM"),
            }
        });

        Some(handle)
    };

    // Only the producers spawned above may keep the channel open.
    drop(rt_tx);

    let runtime = Runtime::new(pipeline, rt_rx, cfg.verbose());
    let stats = runtime.run().await?;
    info!(processed = stats.total(), "sumwatch finished");
    Ok(())
}

/// Fold command-line overrides into the raw config before validation.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(dir) = &args.watch_dir {
        raw.watch.dir = dir.clone();
    }
    if let Some(db) = &args.db {
        raw.store.path = db.clone();
    }
    if let Some(backend) = args.store_backend {
        raw.store.backend = backend;
    }
    if args.verbose {
        raw.report.verbose = true;
    }
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("sumwatch dry-run");
    println!("  watch.dir = {}", cfg.watch_dir().display());
    println!("  store.backend = {:?}", cfg.store_backend());
    println!("  store.path = {}", cfg.store_path().display());
    println!("  sidecar.extension = {}", cfg.sidecar_extension());
    println!("  filter.ignore_prefixes = {:?}", cfg.filter().ignore_prefixes);
    println!("  filter.ignore_names = {:?}", cfg.filter().ignore_names);
    if !cfg.filter().ignore_globs.is_empty() {
        println!("  filter.ignore_globs = {:?}", cfg.filter().ignore_globs);
    }
    println!("  report.verbose = {}", cfg.verbose());
}
