// src/config/mod.rs

//! Configuration loading and validation for sumwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, falling back to defaults (`loader.rs`).
//! - Validate it into an immutable `ConfigFile` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_raw_or_default};
pub use model::{
    ConfigFile, FilterSection, RawConfigFile, ReportSection, SidecarSection, StoreSection,
    WatchSection,
};
