// src/digest.rs

//! Streaming SHA-256 digests of watched files.

use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::{Result, SumwatchError};
use crate::fs::FileSystem;

/// Size of each read fed into the hasher.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Name of the digest algorithm, as shown in reports.
pub const ALGORITHM: &str = "SHA256";

/// Compute the lowercase hex SHA-256 of the file at `path`.
///
/// The file is read in [`CHUNK_SIZE`] pieces so memory use does not depend on
/// file size. Any open or read failure yields [`SumwatchError::ReadError`];
/// a later call starts over from the first byte.
pub fn digest_file(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut reader = fs
        .open_read(path)
        .map_err(|e| SumwatchError::read(path, format!("{e:#}")))?;
    let digest = digest_reader(&mut reader).map_err(|e| SumwatchError::read(path, e))?;
    debug!(path = ?path, digest = %digest, "computed file digest");
    Ok(digest)
}

/// Hash everything `reader` yields until EOF.
pub fn digest_reader<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
