//! Path validation for content files and plugin binaries.
//!
//! Every path entering the host is canonicalized first, then checked to be a
//! regular, readable file with an allowed extension. Rejection is
//! `AccessDenied`; nothing downstream sees an unvalidated path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub(crate) fn canonicalize_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|source| Error::io_at(path, source))
}

/// Checks that `path` names a regular, readable file whose name ends in one
/// of `allowed_exts` (case-insensitive, dot included).
pub(crate) fn ensure_valid_file(path: &Path, allowed_exts: &[&str]) -> Result<()> {
    let meta = fs::metadata(path).map_err(|source| Error::io_at(path, source))?;
    if !meta.is_file() {
        return Err(Error::access_denied(path, "not a regular file"));
    }
    // Probe readability; permissions alone don't tell the whole story.
    fs::File::open(path).map_err(|source| Error::io_at(path, source))?;

    let name = path
        .file_name()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !allowed_exts.iter().any(|ext| name.ends_with(ext)) {
        return Err(Error::access_denied(
            path,
            format!("expected one of: {}", allowed_exts.join(", ")),
        ));
    }
    Ok(())
}

/// Platform suffix for plugin binaries.
pub(crate) fn dynamic_library_ext() -> &'static str {
    match std::env::consts::OS {
        "windows" => ".dll",
        "macos" => ".dylib",
        _ => ".so",
    }
}
