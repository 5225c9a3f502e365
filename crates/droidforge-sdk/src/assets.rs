//! Shared asset mirroring into the app module.
//!
//! The app's shared asset tree is mirrored into the package's asset
//! directory before packaging. Mirror semantics: the destination is fully
//! replaced, so assets deleted from the source do not linger in the package.

use std::fs;
use std::path::Path;

use crate::types::ForgeError;

/// Mirrors `source` into `dest`, replacing any stale destination content.
///
/// Returns the number of files copied. A missing or unreadable source and
/// an unwritable destination are both fatal: the caller must not proceed to
/// packaging.
pub fn sync(source: &Path, dest: &Path) -> Result<u64, ForgeError> {
    if !source.is_dir() {
        return Err(ForgeError::AssetSync(format!(
            "asset source {} is not a directory",
            source.display()
        )));
    }

    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| {
            ForgeError::AssetSync(format!(
                "failed to clear stale assets at {}: {}",
                dest.display(),
                e
            ))
        })?;
    }

    copy_tree(source, dest)
}

fn copy_tree(source: &Path, dest: &Path) -> Result<u64, ForgeError> {
    fs::create_dir_all(dest).map_err(|e| {
        ForgeError::AssetSync(format!("failed to create {}: {}", dest.display(), e))
    })?;

    let entries = fs::read_dir(source).map_err(|e| {
        ForgeError::AssetSync(format!("failed to read {}: {}", source.display(), e))
    })?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| {
            ForgeError::AssetSync(format!("failed to read entry in {}: {}", source.display(), e))
        })?;
        let target = dest.join(entry.file_name());
        if entry.path().is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| {
                ForgeError::AssetSync(format!(
                    "failed to copy {} to {}: {}",
                    entry.path().display(),
                    target.display(),
                    e
                ))
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
