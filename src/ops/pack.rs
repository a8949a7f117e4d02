use std::path::Path;

use crate::config::PackOptions;
use crate::container::Container;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::{read_file, walk_sorted, WalkedKind};
use crate::ops::compact::place;
use crate::table::EntryTable;
use crate::types::{EntryId, EntryKind};

/// pack a directory tree into a new container
///
/// the root directory becomes the single top-level entry, named after its
/// last path component. children are visited in byte-wise name order, so the
/// same tree always packs to the same image.
pub fn pack(root: &Path, opts: &PackOptions) -> Result<Container> {
    let root = root.canonicalize().with_path(root)?;
    let meta = std::fs::metadata(&root).with_path(&root)?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(root));
    }

    let root_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::InvalidEntryName(format!("cannot name packed root {}", root.display()))
        })?
        .to_string();

    let walked = walk_sorted(&root, opts.follow_symlinks, opts.include_hidden)?;

    let mut table = EntryTable::new();
    let mut blob = Vec::new();
    // open directories, indexed by walk depth
    let mut dirs: Vec<EntryId> = Vec::new();
    let mut skipped = 0usize;

    for entry in walked {
        dirs.truncate(entry.depth);
        let parent = match entry.depth {
            0 => None,
            d => dirs.get(d - 1).copied(),
        };
        let name = if entry.depth == 0 {
            root_name.as_str()
        } else {
            entry.name.as_str()
        };

        match entry.kind {
            WalkedKind::Directory => {
                let id = table.push(name, parent, EntryKind::Directory)?;
                dirs.push(id);
            }
            WalkedKind::Regular => {
                let content = read_file(&entry.path)?;
                let extent = place(&mut blob, &content)?;
                table.push(name, parent, EntryKind::File(extent))?;
            }
            WalkedKind::Other => {
                tracing::warn!(path = %entry.path.display(), "skipping non-regular file");
                skipped += 1;
            }
        }
    }

    tracing::info!(
        root = %root.display(),
        entries = table.len(),
        bytes = blob.len(),
        skipped,
        "packed directory"
    );

    Ok(Container::from_parts(table, blob))
}
