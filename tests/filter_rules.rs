mod common;
use crate::common::init_tracing;

use sumwatch::watch::filter::{Classification, EventFilter, SkipReason};
use sumwatch_test_utils::builders::ConfigFileBuilder;

fn default_filter() -> EventFilter {
    let cfg = ConfigFileBuilder::new().watch_dir("/drop").build();
    EventFilter::from_config(&cfg).unwrap()
}

#[test]
fn transport_lock_and_os_artifacts_are_skipped() {
    init_tracing();
    let filter = default_filter();

    assert_eq!(
        filter.classify(".davfs.lock"),
        Classification::Skip(SkipReason::IgnoredPrefix(".davfs.".to_string()))
    );
    assert_eq!(
        filter.classify("._resource"),
        Classification::Skip(SkipReason::IgnoredPrefix("._".to_string()))
    );
    assert_eq!(
        filter.classify("report.sha256"),
        Classification::Skip(SkipReason::SidecarFile)
    );
    assert_eq!(
        filter.classify("report.txt.sha256"),
        Classification::Skip(SkipReason::SidecarFile)
    );
    assert_eq!(
        filter.classify("Thumbs.db"),
        Classification::Skip(SkipReason::SystemArtifact)
    );
    assert_eq!(
        filter.classify(".DS_Store"),
        Classification::Skip(SkipReason::SystemArtifact)
    );
}

#[test]
fn ordinary_names_are_processed() {
    let filter = default_filter();

    for name in ["report.txt", "archive.tar.gz", "sha256", ".hidden", "thumbs.db", "x.sha2560"] {
        assert!(
            filter.classify(name).is_process(),
            "{name} should be processed"
        );
    }
}

#[test]
fn artifact_names_match_exactly_not_as_substrings() {
    let filter = default_filter();

    assert!(filter.classify("my.DS_Store.bak").is_process());
    assert!(filter.classify("Thumbs.db.txt").is_process());
}

#[test]
fn path_like_or_empty_names_are_rejected() {
    let filter = default_filter();

    for name in ["", ".", "..", "sub/file.txt", "..\\evil"] {
        assert_eq!(
            filter.classify(name),
            Classification::Skip(SkipReason::InvalidName),
            "{name:?}"
        );
    }
}

#[test]
fn custom_extension_prefixes_and_globs() {
    let cfg = ConfigFileBuilder::new()
        .watch_dir("/drop")
        .sidecar_extension(".md5sum")
        .ignore_prefix("~$")
        .ignore_name("desktop.ini")
        .ignore_glob("*.part")
        .build();
    let filter = EventFilter::from_config(&cfg).unwrap();

    assert_eq!(
        filter.classify("data.bin.md5sum"),
        Classification::Skip(SkipReason::SidecarFile)
    );
    // With a different extension, `.sha256` files are ordinary files.
    assert!(filter.classify("data.bin.sha256").is_process());
    assert_eq!(
        filter.classify("~$report.docx"),
        Classification::Skip(SkipReason::IgnoredPrefix("~$".to_string()))
    );
    assert_eq!(
        filter.classify("desktop.ini"),
        Classification::Skip(SkipReason::SystemArtifact)
    );
    assert_eq!(
        filter.classify("upload.bin.part"),
        Classification::Skip(SkipReason::IgnoredPattern)
    );
    assert!(filter.classify("upload.bin").is_process());
}
