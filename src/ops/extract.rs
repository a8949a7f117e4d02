use std::path::Path;

use crate::config::ExtractOptions;
use crate::container::{content_of, Container};
use crate::error::{Error, Result};
use crate::fs::{create_dir_all, write_file};
use crate::types::{validate_entry_name, Entry};

/// running totals for the summary log line
#[derive(Default)]
struct Progress {
    files: usize,
    dirs: usize,
    bytes: usize,
}

/// mirror the whole container under `dest`
pub fn extract_all(container: &Container, dest: &Path, opts: &ExtractOptions) -> Result<()> {
    create_dir_all(dest)?;

    let mut progress = Progress::default();
    for entry in container.table().children_of(None) {
        extract_entry(container, entry, dest, opts, &mut progress)?;
    }

    tracing::info!(
        dest = %dest.display(),
        files = progress.files,
        dirs = progress.dirs,
        bytes = progress.bytes,
        "extracted container"
    );
    Ok(())
}

/// extract the entry at `path` into `dest`
///
/// a file lands at `dest/<name>`. a directory is recreated as `dest/<name>`
/// together with everything below it.
pub fn extract_subtree(
    container: &Container,
    path: &str,
    dest: &Path,
    opts: &ExtractOptions,
) -> Result<()> {
    let id = container.table().resolve(path)?;
    let entry = container
        .table()
        .get(id)
        .ok_or_else(|| Error::PathNotFound(path.to_string()))?;

    create_dir_all(dest)?;

    let mut progress = Progress::default();
    extract_entry(container, entry, dest, opts, &mut progress)?;

    tracing::info!(
        path,
        dest = %dest.display(),
        files = progress.files,
        dirs = progress.dirs,
        bytes = progress.bytes,
        "extracted subtree"
    );
    Ok(())
}

fn extract_entry(
    container: &Container,
    entry: &Entry,
    dest: &Path,
    opts: &ExtractOptions,
    progress: &mut Progress,
) -> Result<()> {
    let table = container.table();

    // names from older files are untrusted; never let one escape `dest`
    validate_entry_name(&entry.name)?;
    let target = dest.join(&entry.name);

    if entry.is_directory() {
        create_dir_all(&target)?;
        progress.dirs += 1;

        for child in table.children_of(Some(entry.id())) {
            extract_entry(container, child, &target, opts, progress)?;
        }
    } else {
        let content = content_of(table, container.blob(), entry)?;
        if !opts.overwrite && target.exists() {
            return Err(Error::TargetExists(target));
        }

        write_file(&target, content)?;
        tracing::debug!(path = %target.display(), size = content.len(), "wrote file");
        progress.files += 1;
        progress.bytes += content.len();
    }

    Ok(())
}
