//! Size-gated script reading.
//!
//! Extension corpora contain the occasional pathological file (bundled
//! WASM dumps, source maps renamed to .js). Reading is gated by size:
//! - > 64 MiB: skipped with a warning
//! - > 8 MiB: read, with a debug note
//! Script text is decoded lossily; minified bundles are not always valid
//! UTF-8 and the matcher only needs lexical fidelity.

use std::path::Path;

use crate::error::{Error, Result};

/// Size at which to note large files (8 MiB).
pub const LARGE_FILE_NOTE: u64 = 8 * 1024 * 1024;

/// Maximum script size to read (64 MiB).
pub const MAX_SCRIPT_SIZE: u64 = 64 * 1024 * 1024;

/// Read a script file, or `None` if it exceeds the size gate.
pub fn read_script(path: &Path) -> Result<Option<String>> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let size = metadata.len();
    if size > MAX_SCRIPT_SIZE {
        tracing::warn!(
            path = %path.display(),
            size_mb = size / (1024 * 1024),
            "script exceeds size gate, skipped"
        );
        return Ok(None);
    }
    if size > LARGE_FILE_NOTE {
        tracing::debug!(
            path = %path.display(),
            size_mb = size / (1024 * 1024),
            "reading large script"
        );
    }

    let bytes = std::fs::read(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
