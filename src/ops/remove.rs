use crate::container::Container;
use crate::error::{Error, Result};
use crate::ops::compact::{compact, repack, BlobChange};

/// delete a file or an empty directory, then rebuild the blob
///
/// the removed entry's id is never reissued and no other entry's parent
/// reference changes, so entries after it in the table stay attached to the
/// right directories. positions are recomputed when the container is saved.
pub fn delete(container: &mut Container, path: &str) -> Result<()> {
    let id = container.table().resolve(path)?;

    let is_dir = container
        .table()
        .get(id)
        .map(|e| e.is_directory())
        .unwrap_or(false);

    let layout = if is_dir {
        if container.table().has_children(id) {
            return Err(Error::DirectoryNotEmpty(path.to_string()));
        }
        repack(container.table(), container.blob())?
    } else {
        compact(container.table(), container.blob(), BlobChange::Drop(id))?
    };

    container.table_mut().remove(id);
    layout.apply(container);

    tracing::debug!(path, directory = is_dir, "deleted entry");
    Ok(())
}
