#![allow(dead_code)]

pub use sumwatch_test_utils::init_tracing;

use std::path::Path;
use std::sync::Arc;

use sumwatch::engine::IngestPipeline;
use sumwatch::fs::FileSystem;
use sumwatch::store::RecordStore;
use sumwatch::watch::EventFilter;
use sumwatch_test_utils::builders::ConfigFileBuilder;

/// SHA-256 of the empty input.
pub const EMPTY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// SHA-256 of `b"hello"`.
pub const HELLO_SHA256: &str =
    "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Pipeline over `dir` with the default filter rules and `.sha256` sidecars.
pub fn default_pipeline(
    dir: &Path,
    store: Arc<dyn RecordStore>,
    fs: Arc<dyn FileSystem>,
) -> IngestPipeline {
    let cfg = ConfigFileBuilder::new().watch_dir(dir).build();
    let filter = EventFilter::from_config(&cfg).expect("default filter compiles");
    IngestPipeline::new(dir, filter, store, fs, cfg.sidecar_extension())
}
