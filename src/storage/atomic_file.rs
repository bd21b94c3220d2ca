//! Atomic whole-file replacement
//!
//! ```text
//! 1. write <target>.tmp
//! 2. fsync <target>.tmp
//! 3. rename(<target>.tmp → <target>)   ← commit point
//! 4. fsync parent directory
//! ```
//!
//! `rename()` is atomic on POSIX, so a reader sees either the previous
//! document or the new one, never a torn write.
//!
//! Once the rename succeeds the new document is in place; a failing
//! directory sync after that point is logged, not returned.

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Replace `target` with `bytes`
pub(crate) fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic_with(target, bytes, sync_dir)
}

fn write_atomic_with<F>(target: &Path, bytes: &[u8], sync_parent: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let temp_path = temp_path_for(target);

    let result = (|| -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        std::fs::rename(&temp_path, target)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
        return result;
    }

    // committed
    if let Some(parent) = target.parent() {
        if let Err(e) = sync_parent(parent) {
            warn!(path = %target.display(), error = %e, "directory sync failed after commit");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("doc.json");

        write_atomic(&target, b"[1]").unwrap();
        write_atomic(&target, b"[1,2]").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"[1,2]");
        assert!(!temp_dir.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn test_missing_parent_fails_cleanly() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("missing").join("doc.json");

        assert!(write_atomic(&target, b"[]").is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_directory_sync_failure_after_commit_is_not_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("doc.json");
        write_atomic(&target, b"[1]").unwrap();

        let result = write_atomic_with(&target, b"[1,2]", |_| {
            Err(io::Error::new(io::ErrorKind::Other, "EIO"))
        });

        assert!(result.is_ok());
        assert_eq!(std::fs::read(&target).unwrap(), b"[1,2]");
        assert!(!temp_path_for(&target).exists());
    }
}
