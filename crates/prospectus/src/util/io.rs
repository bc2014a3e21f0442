//! I/O utility functions

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling temp path: `report.csv` -> `report.csv.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("export"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to `path` by writing a sibling temp file and renaming it
/// over the target, so readers never observe a half-written export.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp = temp_path(path);
    fs::write(&temp, content)?;
    fs::rename(&temp, path)?;
    Ok(())
}
