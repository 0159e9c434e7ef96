// Directory enumeration and small path helpers, kept thin over std::fs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Collects `*.txt` entries directly under `dir` in the filesystem's natural
/// enumeration order (not sorted).
pub fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().map(|ext| ext == "txt").unwrap_or(false) {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// The basename a per-file record stores on the wire, so a decompressed
/// record can never escape its output directory.
pub fn basename(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| Error::Fatal(format!("{} has no file name component", path.display())))
}
