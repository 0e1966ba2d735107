//! Filesystem helpers.

use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::MemoryError;

/// Replace `path` with `data` via a sibling temp file and rename.
///
/// Readers see either the previous contents or the new contents, never a
/// partial write. Parent directories are created as needed and the result
/// is owner-only on unix.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), MemoryError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // Same directory as the target so the rename never crosses filesystems.
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| MemoryError::Io(err.error))?;

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
