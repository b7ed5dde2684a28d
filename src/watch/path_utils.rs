// src/watch/path_utils.rs

//! Path helpers for turning watcher paths into basenames.

use std::path::Path;

/// Basename of `path` if it sits directly inside `dir`.
///
/// - First compares `path.parent()` with `dir` as given.
/// - If that fails (symlinked or differently prefixed roots, e.g. macOS
///   `/private/var`), compares the canonicalised forms. Only the parent is
///   canonicalised, so this still works after the file itself is gone.
///
/// Returns `None` for paths outside `dir`, in subdirectories, or with
/// non-UTF-8 names.
pub fn basename_in_dir(dir: &Path, path: &Path) -> Option<String> {
    let parent = path.parent()?;
    let name = path.file_name()?.to_str()?;

    if parent == dir {
        return Some(name.to_string());
    }

    if let (Ok(dir_canon), Ok(parent_canon)) = (dir.canonicalize(), parent.canonicalize()) {
        if dir_canon == parent_canon {
            return Some(name.to_string());
        }
    }

    None
}
