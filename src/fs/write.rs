use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};

/// create a directory path, succeeding if it already exists
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_path(path)
}

/// write a buffer to a file, replacing any existing content
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_path(path)
}

/// replace `path` atomically: temp file -> fsync -> rename -> fsync parent
///
/// the temp file lives next to the target so the rename stays on one
/// filesystem.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
        })?
        .to_string_lossy();
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let written = (|| {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(data).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
        fs::rename(&tmp_path, path).with_path(path)
    })();

    if written.is_err() {
        // best effort; the write error is returned either way
        let _ = fs::remove_file(&tmp_path);
        return written;
    }

    fsync_dir(parent)
}

/// fsync a directory so a rename inside it is durable
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_dir_all_idempotent() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        create_dir_all(&nested).unwrap();
        create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.bin");
        fs::write(&target, "old").unwrap();

        write_atomic(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        // no temp files left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_missing_parent() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing/out.bin");
        assert!(write_atomic(&target, b"x").is_err());
    }
}
