//! Filesystem helpers

use super::error::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents` atomically.
///
/// Writes a sibling temp file, syncs it, then renames it over the target, so
/// readers see either the old file or the new one and never a partial write.
/// Existing permissions are carried over.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let existing_perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let mut tmp = tempfile::Builder::new()
        .prefix(".release-sync.")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Some(perms) = existing_perms {
        fs::set_permissions(tmp.path(), perms)?;
    }

    // On failure the NamedTempFile is dropped, which removes it.
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
