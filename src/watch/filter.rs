// src/watch/filter.rs

//! Name-based classification of incoming events.
//!
//! Runs before any I/O: lock files from the upload transport, OS artifacts
//! and our own sidecar files never reach the pipeline. Dropping sidecars here
//! is what keeps the watcher from reacting to its own writes.

use std::collections::HashSet;
use std::fmt;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::{ConfigFile, FilterSection};
use crate::errors::Result;

/// Why a name was classified as [`Classification::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Starts with one of the configured prefixes.
    IgnoredPrefix(String),
    /// Ends with the sidecar extension.
    SidecarFile,
    /// Exactly matches one of the configured OS artifact names.
    SystemArtifact,
    /// Matches one of the configured glob patterns.
    IgnoredPattern,
    /// Empty, `.`/`..`, or contains a path separator.
    InvalidName,
    /// The name passed every rule but does not resolve to a regular file.
    /// Assigned by the pipeline after its filesystem check, never by
    /// [`EventFilter::classify`].
    NotARegularFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::IgnoredPrefix(prefix) => write!(f, "ignored prefix {prefix:?}"),
            SkipReason::SidecarFile => f.write_str("sidecar file"),
            SkipReason::SystemArtifact => f.write_str("system artifact"),
            SkipReason::IgnoredPattern => f.write_str("ignored pattern"),
            SkipReason::InvalidName => f.write_str("not a plain file name"),
            SkipReason::NotARegularFile => f.write_str("not a regular file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Skip(SkipReason),
    Process,
}

impl Classification {
    pub fn is_process(&self) -> bool {
        matches!(self, Classification::Process)
    }
}

/// Compiled filter rules.
#[derive(Clone)]
pub struct EventFilter {
    prefixes: Vec<String>,
    names: HashSet<String>,
    /// `.` + sidecar extension, e.g. `".sha256"`.
    sidecar_suffix: String,
    globs: Option<GlobSet>,
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFilter")
            .field("prefixes", &self.prefixes)
            .field("names", &self.names)
            .field("sidecar_suffix", &self.sidecar_suffix)
            .finish_non_exhaustive()
    }
}

impl EventFilter {
    pub fn new(rules: &FilterSection, sidecar_extension: &str) -> Result<Self> {
        let globs = if rules.ignore_globs.is_empty() {
            None
        } else {
            Some(build_globset(&rules.ignore_globs)?)
        };

        Ok(Self {
            prefixes: rules.ignore_prefixes.clone(),
            names: rules.ignore_names.iter().cloned().collect(),
            sidecar_suffix: format!(".{sidecar_extension}"),
            globs,
        })
    }

    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Self::new(cfg.filter(), cfg.sidecar_extension())
    }

    /// Classify a basename. Pure: touches neither the filesystem nor the store.
    pub fn classify(&self, name: &str) -> Classification {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Classification::Skip(SkipReason::InvalidName);
        }

        if let Some(prefix) = self.prefixes.iter().find(|p| name.starts_with(p.as_str())) {
            return Classification::Skip(SkipReason::IgnoredPrefix(prefix.clone()));
        }

        if name.ends_with(&self.sidecar_suffix) {
            return Classification::Skip(SkipReason::SidecarFile);
        }

        if self.names.contains(name) {
            return Classification::Skip(SkipReason::SystemArtifact);
        }

        if let Some(globs) = &self.globs {
            if globs.is_match(name) {
                return Classification::Skip(SkipReason::IgnoredPattern);
            }
        }

        Classification::Process
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build().context("building ignore globset")?)
}
