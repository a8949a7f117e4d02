use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};

/// file type as seen by the walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkedKind {
    Directory,
    Regular,
    /// symlinks (when not followed), fifos, sockets, device nodes
    Other,
}

/// one entry produced by [`walk_sorted`]
#[derive(Debug, Clone)]
pub struct WalkedEntry {
    pub path: PathBuf,
    /// 0 for the walk root
    pub depth: usize,
    pub name: String,
    pub kind: WalkedKind,
}

/// walk a directory tree depth-first, children sorted by name at each level
///
/// the root itself is yielded first at depth 0. with `include_hidden` off,
/// dot-entries below the root are pruned along with their subtrees.
pub fn walk_sorted(
    root: &Path,
    follow_symlinks: bool,
    include_hidden: bool,
) -> Result<Vec<WalkedEntry>> {
    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || include_hidden || !e.file_name().to_string_lossy().starts_with('.')
        });

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path().to_path_buf();

        let name = match entry.file_name().to_str() {
            Some(name) => name.to_string(),
            None => {
                return Err(Error::InvalidEntryName(format!(
                    "name is not valid utf-8: {}",
                    path.display()
                )))
            }
        };

        let ft = entry.file_type();
        let kind = if ft.is_dir() {
            WalkedKind::Directory
        } else if ft.is_file() {
            WalkedKind::Regular
        } else {
            WalkedKind::Other
        };

        entries.push(WalkedEntry {
            path,
            depth: entry.depth(),
            name,
            kind,
        });
    }

    Ok(entries)
}

/// read a file's full content
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_path(path)
}
