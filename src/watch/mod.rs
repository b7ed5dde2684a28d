// src/watch/mod.rs

//! The notification side of sumwatch.
//!
//! This module is responsible for:
//! - Classifying basenames as ignorable or eligible (`filter`).
//! - Wiring up a filesystem watcher (`notify`) on one directory and turning
//!   its events into `FileEvent`s.
//! - Listing the directory once for `--once` runs (`sweep`).
//!
//! It knows nothing about hashing or the record store.

pub mod filter;
pub mod path_utils;
pub mod sweep;
pub mod watcher;

pub use filter::{Classification, EventFilter, SkipReason};
pub use watcher::{spawn_watcher, translate_event, WatcherHandle};
