mod common;
use crate::common::{default_pipeline, init_tracing, HELLO_SHA256};
use sumwatch_test_utils::with_timeout;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tempfile::tempdir;
use tokio::sync::mpsc;

use sumwatch::cli::CliArgs;
use sumwatch::engine::{Runtime, RuntimeEvent};
use sumwatch::fs::mock::MockFileSystem;
use sumwatch::store::{MemoryRecordStore, RecordStore, SqliteRecordStore};
use sumwatch::types::FileEvent;
use sumwatch::watch::sweep::{existing_file_events, feed};

#[test]
fn sweep_lists_regular_files_sorted() {
    let fs = MockFileSystem::new();
    fs.add_dir("/drop");
    fs.add_file("/drop/zeta.txt", b"z".to_vec());
    fs.add_file("/drop/alpha.txt", b"a".to_vec());
    fs.add_file("/drop/alpha.txt.sha256", b"".to_vec());
    fs.add_dir("/drop/sub");
    fs.add_file("/drop/sub/nested.txt", b"n".to_vec());

    let events = existing_file_events(&fs, Path::new("/drop")).unwrap();

    assert_eq!(
        events,
        vec![
            FileEvent::write_complete("alpha.txt"),
            FileEvent::write_complete("alpha.txt.sha256"),
            FileEvent::write_complete("zeta.txt"),
        ]
    );
}

#[test]
fn sweeping_a_missing_directory_fails() {
    let fs = MockFileSystem::new();
    assert!(existing_file_events(&fs, Path::new("/nowhere")).is_err());
}

#[tokio::test]
async fn feed_ends_with_a_shutdown_request() {
    let (tx, mut rx) = mpsc::channel(8);
    feed(vec![FileEvent::write_complete("a.txt")], tx).await;

    assert!(matches!(rx.recv().await, Some(RuntimeEvent::File(ev)) if ev.name == "a.txt"));
    assert!(matches!(rx.recv().await, Some(RuntimeEvent::ShutdownRequested)));
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn sweep_then_runtime_records_each_file_once() -> anyhow::Result<()> {
    init_tracing();
    let fs = Arc::new(MockFileSystem::new());
    fs.add_dir("/drop");
    fs.add_file("/drop/a.txt", b"hello".to_vec());
    fs.add_file("/drop/b.txt", b"".to_vec());
    fs.add_file("/drop/Thumbs.db", b"junk".to_vec());
    let store = Arc::new(MemoryRecordStore::new());
    let pipeline = Arc::new(default_pipeline(Path::new("/drop"), store.clone(), fs.clone()));

    let (tx, rx) = mpsc::channel(8);
    let events = existing_file_events(fs.as_ref(), Path::new("/drop"))?;
    tokio::spawn(feed(events, tx));
    let stats = with_timeout(Runtime::new(pipeline, rx, false).run()).await?;

    assert_eq!(stats.recorded, 2);
    assert_eq!(stats.filtered, 1);
    assert_eq!(store.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn once_mode_backfills_a_real_directory() -> anyhow::Result<()> {
    init_tracing();
    let drop_dir = tempdir()?;
    let state_dir = tempdir()?;
    let db = state_dir.path().join("filewatch.db");
    fs::write(drop_dir.path().join("report.txt"), b"hello")?;
    fs::write(drop_dir.path().join(".davfs.lock"), b"")?;

    let args = CliArgs::parse_from([
        "sumwatch",
        "--once",
        "--watch-dir",
        drop_dir.path().to_str().unwrap(),
        "--db",
        db.to_str().unwrap(),
    ]);
    with_timeout(sumwatch::run(args.clone())).await?;

    assert_eq!(
        fs::read_to_string(drop_dir.path().join("report.txt.sha256"))?,
        format!("{HELLO_SHA256}  report.txt\n")
    );
    assert!(!drop_dir.path().join(".davfs.lock.sha256").exists());

    let store = SqliteRecordStore::open(&db)?;
    assert_eq!(store.get("report.txt")?.unwrap().digest, HELLO_SHA256);

    // A second sweep finds everything already processed.
    with_timeout(sumwatch::run(args)).await?;
    let conn = rusqlite::Connection::open(&db)?;
    let rows: i64 = conn.query_row("SELECT COUNT(*) FROM file_hash_log", [], |r| r.get(0))?;
    assert_eq!(rows, 1);
    Ok(())
}
