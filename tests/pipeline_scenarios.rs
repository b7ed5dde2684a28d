mod common;
use crate::common::{default_pipeline, init_tracing, EMPTY_SHA256, HELLO_SHA256};

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use sumwatch::digest::digest_file;
use sumwatch::engine::report::{console_line, log_level};
use sumwatch::engine::{DedupReason, FailureStage, FileOutcome};
use sumwatch::fs::mock::MockFileSystem;
use sumwatch::fs::RealFileSystem;
use sumwatch::sidecar::SidecarEntry;
use sumwatch::store::{MemoryRecordStore, RecordStore, SqliteRecordStore};
use sumwatch::types::FileEvent;
use sumwatch::watch::filter::SkipReason;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn mock_drop() -> (Arc<MockFileSystem>, Arc<MemoryRecordStore>) {
    let fs = Arc::new(MockFileSystem::new());
    fs.add_dir("/drop");
    (fs, Arc::new(MemoryRecordStore::new()))
}

#[test]
fn report_txt_end_to_end_on_disk() -> TestResult {
    init_tracing();

    let drop_dir = tempdir()?;
    let state_dir = tempdir()?;
    fs::write(drop_dir.path().join("report.txt"), b"hello")?;

    let store = Arc::new(SqliteRecordStore::open(state_dir.path().join("filewatch.db"))?);
    let pipeline = default_pipeline(drop_dir.path(), store.clone(), Arc::new(RealFileSystem));

    let outcome = pipeline.process(&FileEvent::write_complete("report.txt"));

    let sidecar = drop_dir.path().join("report.txt.sha256");
    assert_eq!(
        outcome,
        FileOutcome::Recorded {
            name: "report.txt".to_string(),
            digest: HELLO_SHA256.to_string(),
            sidecar: sidecar.clone(),
        }
    );

    let record = store.get("report.txt")?.expect("record stored");
    assert_eq!(record.digest, HELLO_SHA256);
    assert_eq!(
        Path::new(&record.full_path),
        drop_dir.path().join("report.txt")
    );

    assert_eq!(
        fs::read_to_string(&sidecar)?,
        format!("{HELLO_SHA256}  report.txt\n")
    );

    let line = console_line(&outcome, false).expect("success is always reported");
    assert!(line.contains("report.txt"), "{line}");
    assert!(line.contains(HELLO_SHA256), "{line}");
    Ok(())
}

#[test]
fn sidecar_digest_matches_an_independent_recompute() -> TestResult {
    let drop_dir = tempdir()?;
    let state_dir = tempdir()?;
    let payload: Vec<u8> = (0..50_000u32).map(|i| (i * 7 % 256) as u8).collect();
    fs::write(drop_dir.path().join("big.bin"), &payload)?;

    let store = Arc::new(SqliteRecordStore::open(state_dir.path().join("db.sqlite"))?);
    let pipeline = default_pipeline(drop_dir.path(), store, Arc::new(RealFileSystem));
    assert!(pipeline.process(&FileEvent::rename("big.bin")).is_recorded());

    let entry = SidecarEntry::parse(&fs::read_to_string(
        drop_dir.path().join("big.bin.sha256"),
    )?)
    .expect("well-formed sidecar");
    assert_eq!(entry.filename, "big.bin");
    assert_eq!(
        entry.digest,
        digest_file(&RealFileSystem, &drop_dir.path().join("big.bin"))?
    );
    Ok(())
}

#[test]
fn same_name_twice_yields_one_record_and_one_sidecar_write() -> TestResult {
    let (fs, store) = mock_drop();
    fs.add_file("/drop/report.txt", b"hello".to_vec());
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    let first = pipeline.process(&FileEvent::write_complete("report.txt"));
    let second = pipeline.process(&FileEvent::rename("report.txt"));

    assert!(first.is_recorded());
    assert_eq!(
        second,
        FileOutcome::Deduped {
            name: "report.txt".to_string(),
            reason: DedupReason::InStore,
        }
    );
    assert_eq!(store.len(), 1);
    assert_eq!(fs.write_attempts("/drop/report.txt.sha256"), 1);
    Ok(())
}

#[test]
fn ignorable_names_cause_no_io() {
    let (fs, store) = mock_drop();
    store.set_fail_inserts(true);
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    for name in [".davfs.lock", "._resource", "report.sha256", "Thumbs.db", ".DS_Store"] {
        fs.add_file(format!("/drop/{name}"), b"x".to_vec());
        let outcome = pipeline.process(&FileEvent::write_complete(name));
        assert!(
            matches!(outcome, FileOutcome::FilteredOut { .. }),
            "{name}: {outcome:?}"
        );
        assert_eq!(fs.write_attempts(format!("/drop/{name}.sha256")), 0);
    }
    assert!(store.is_empty());
}

#[test]
fn existing_sidecar_dedups_even_without_a_record() {
    let (fs, store) = mock_drop();
    fs.add_file("/drop/old.txt", b"hello".to_vec());
    fs.add_file("/drop/old.txt.sha256", format!("{HELLO_SHA256}  old.txt\n"));
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    let outcome = pipeline.process(&FileEvent::write_complete("old.txt"));

    assert_eq!(
        outcome,
        FileOutcome::Deduped {
            name: "old.txt".to_string(),
            reason: DedupReason::SidecarPresent,
        }
    );
    assert!(store.is_empty());
    assert_eq!(fs.write_attempts("/drop/old.txt.sha256"), 0);
}

#[test]
fn directories_and_vanished_files_are_filtered_out() {
    let (fs, store) = mock_drop();
    fs.add_dir("/drop/subdir");
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    for name in ["subdir", "gone.txt"] {
        assert_eq!(
            pipeline.process(&FileEvent::rename(name)),
            FileOutcome::FilteredOut {
                name: name.to_string(),
                reason: SkipReason::NotARegularFile,
            }
        );
    }
    assert!(store.is_empty());
}

#[test]
fn read_failure_in_the_middle_does_not_affect_neighbours() -> TestResult {
    let (fs, store) = mock_drop();
    fs.add_file("/drop/first.txt", b"hello".to_vec());
    fs.add_file("/drop/second.txt", b"removed before read".to_vec());
    fs.add_file("/drop/third.txt", b"".to_vec());
    fs.fail_open("/drop/second.txt");
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    let outcomes: Vec<FileOutcome> = ["first.txt", "second.txt", "third.txt"]
        .into_iter()
        .map(|name| pipeline.process(&FileEvent::write_complete(name)))
        .collect();

    assert!(outcomes[0].is_recorded());
    match &outcomes[1] {
        FileOutcome::Failed { name, stage, error } => {
            assert_eq!(name, "second.txt");
            assert_eq!(*stage, FailureStage::Read);
            assert!(error.contains("second.txt"), "{error}");
        }
        other => panic!("expected read failure, got {other:?}"),
    }
    assert!(outcomes[2].is_recorded());

    assert_eq!(store.get("first.txt")?.unwrap().digest, HELLO_SHA256);
    assert_eq!(store.get("third.txt")?.unwrap().digest, EMPTY_SHA256);
    assert!(!store.exists("second.txt")?);
    assert_eq!(fs.write_attempts("/drop/second.txt.sha256"), 0);

    let line = console_line(&outcomes[1], false).unwrap();
    assert!(line.starts_with("[!] Error processing second.txt:"), "{line}");
    Ok(())
}

#[test]
fn store_failure_leaves_the_file_unrecorded_and_retryable() -> TestResult {
    let (fs, store) = mock_drop();
    fs.add_file("/drop/report.txt", b"hello".to_vec());
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    store.set_fail_inserts(true);
    let outcome = pipeline.process(&FileEvent::write_complete("report.txt"));
    assert!(
        matches!(
            outcome,
            FileOutcome::Failed {
                stage: FailureStage::Store,
                ..
            }
        ),
        "{outcome:?}"
    );
    assert!(!store.exists("report.txt")?);
    assert_eq!(fs.write_attempts("/drop/report.txt.sha256"), 0);

    // A re-delivered event for the same file goes through once the store recovers.
    store.set_fail_inserts(false);
    assert!(pipeline
        .process(&FileEvent::write_complete("report.txt"))
        .is_recorded());
    assert!(store.exists("report.txt")?);
    Ok(())
}

#[test]
fn sidecar_failure_after_insert_is_reported_as_divergence() -> TestResult {
    let (fs, store) = mock_drop();
    fs.add_file("/drop/report.txt", b"hello".to_vec());
    fs.fail_writes_to("/drop/report.txt.sha256");
    let pipeline = default_pipeline(Path::new("/drop"), store.clone(), fs.clone());

    let outcome = pipeline.process(&FileEvent::write_complete("report.txt"));

    match &outcome {
        FileOutcome::Diverged {
            name,
            digest,
            error,
        } => {
            assert_eq!(name, "report.txt");
            assert_eq!(digest, HELLO_SHA256);
            assert!(error.contains("report.txt.sha256"), "{error}");
        }
        other => panic!("expected divergence, got {other:?}"),
    }

    assert!(store.exists("report.txt")?);
    assert!(fs.contents("/drop/report.txt.sha256").is_none());

    let line = console_line(&outcome, false).unwrap();
    assert!(line.starts_with("[!!] report.txt"), "{line}");
    assert!(line.contains("sidecar write failed"), "{line}");

    // The store now marks the file processed: later events are deduped and
    // the sidecar is never attempted again.
    assert_eq!(
        pipeline.process(&FileEvent::write_complete("report.txt")),
        FileOutcome::Deduped {
            name: "report.txt".to_string(),
            reason: DedupReason::InStore,
        }
    );
    assert_eq!(fs.write_attempts("/drop/report.txt.sha256"), 1);
    Ok(())
}

#[test]
fn quiet_outcomes_only_print_in_verbose_mode() {
    let skipped = FileOutcome::FilteredOut {
        name: "Thumbs.db".to_string(),
        reason: SkipReason::SystemArtifact,
    };
    let deduped = FileOutcome::Deduped {
        name: "a.txt".to_string(),
        reason: DedupReason::InStore,
    };

    assert!(console_line(&skipped, false).is_none());
    assert!(console_line(&deduped, false).is_none());
    assert_eq!(
        console_line(&skipped, true).as_deref(),
        Some("[-] Thumbs.db skipped: system artifact")
    );
    assert_eq!(
        console_line(&deduped, true).as_deref(),
        Some("[-] a.txt skipped: already recorded")
    );
}

#[cfg(unix)]
#[test]
fn dangling_sidecar_symlink_does_not_block_processing() -> TestResult {
    init_tracing();

    let drop_dir = tempdir()?;
    let state_dir = tempdir()?;
    fs::write(drop_dir.path().join("a.txt"), b"hello")?;
    std::os::unix::fs::symlink(
        state_dir.path().join("missing-target"),
        drop_dir.path().join("a.txt.sha256"),
    )?;

    let store = Arc::new(SqliteRecordStore::open(state_dir.path().join("db.sqlite"))?);
    let pipeline = default_pipeline(drop_dir.path(), store.clone(), Arc::new(RealFileSystem));

    let outcome = pipeline.process(&FileEvent::write_complete("a.txt"));

    assert!(outcome.is_recorded(), "{outcome:?}");
    assert_eq!(store.get("a.txt")?.unwrap().digest, HELLO_SHA256);
    Ok(())
}

#[test]
fn store_failures_are_logged_above_read_failures() {
    let failed = |stage| FileOutcome::Failed {
        name: "a.txt".to_string(),
        stage,
        error: "boom".to_string(),
    };

    assert_eq!(log_level(&failed(FailureStage::Store)), tracing::Level::ERROR);
    assert_eq!(log_level(&failed(FailureStage::Lookup)), tracing::Level::ERROR);
    assert_eq!(log_level(&failed(FailureStage::Read)), tracing::Level::WARN);
    assert_eq!(
        log_level(&FileOutcome::Diverged {
            name: "a.txt".to_string(),
            digest: HELLO_SHA256.to_string(),
            error: "disk full".to_string(),
        }),
        tracing::Level::ERROR
    );
}
