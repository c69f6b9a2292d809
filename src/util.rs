//! Internal utilities.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Follows symlinks so a linked hosts file is updated in place.
///
/// Falls back to `target` itself when it does not exist yet.
#[must_use]
pub fn resolve_target(target: &Path) -> PathBuf {
    fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf())
}

/// Replaces `target` with `content` via write, fsync and rename.
///
/// The temporary file gets a unique name in the target's directory, so the
/// rename stays on one filesystem and never touches unrelated files. An
/// existing target's permissions carry over; new files get `0644` on Unix.
/// On failure the temporary file is removed.
///
/// # Errors
///
/// Returns the first I/O error from create, write, sync, chmod or rename.
pub fn write_atomic(target: &Path, content: &[u8]) -> io::Result<()> {
    let target = resolve_target(target);
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let existing = fs::metadata(&target).ok().map(|m| m.permissions());

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    match existing {
        Some(permissions) => temp.as_file().set_permissions(permissions)?,
        None => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                temp.as_file()
                    .set_permissions(fs::Permissions::from_mode(0o644))?;
            }
        }
    }

    temp.persist(&target).map_err(|e| e.error)?;
    sync_dir(dir)
}

/// Flushes a directory entry change (the rename) to disk.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
