//! Atomic file replacement shared by the registry and genesis writers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Sibling temp path used while `path` is being replaced.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `data` to `path` atomically.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over `path`, so an interrupted run never leaves a truncated
/// file under the canonical name.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path);
    let result = std::fs::write(&tmp_path, data).and_then(|()| std::fs::rename(&tmp_path, path));
    if let Err(e) = result {
        // A short write or failed rename leaves the sibling behind.
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}
