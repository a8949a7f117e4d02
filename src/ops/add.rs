use crate::container::Container;
use crate::error::Result;
use crate::ops::compact::{compact, compact_append, BlobChange};
use crate::types::{validate_entry_name, EntryId, EntryKind};

/// what [`add_file`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// a new file entry was appended
    Created(EntryId),
    /// an existing file entry got new content
    Replaced(EntryId),
}

impl AddOutcome {
    pub fn id(&self) -> EntryId {
        match self {
            AddOutcome::Created(id) | AddOutcome::Replaced(id) => *id,
        }
    }
}

/// add or overwrite a file inside a container directory
///
/// an existing *file* child with the same name is overwritten in place. a
/// directory child with the same name does not count as a match, so the new
/// file is appended alongside it.
pub fn add_file(
    container: &mut Container,
    dir_path: &str,
    filename: &str,
    content: &[u8],
) -> Result<AddOutcome> {
    validate_entry_name(filename)?;
    let parent = container.table().resolve_dir(dir_path)?;

    let existing = container
        .table()
        .children_of(parent)
        .find(|e| e.is_file() && e.name == filename)
        .map(|e| e.id());

    match existing {
        Some(id) => {
            let layout = compact(container.table(), container.blob(), BlobChange::Write(id, content))?;
            layout.apply(container);

            tracing::debug!(dir = dir_path, name = filename, size = content.len(), "replaced file");
            Ok(AddOutcome::Replaced(id))
        }
        None => {
            let (layout, extent) = compact_append(container.table(), container.blob(), content)?;
            let id = container
                .table_mut()
                .push(filename, parent, EntryKind::File(extent))?;
            layout.apply(container);

            tracing::debug!(dir = dir_path, name = filename, size = content.len(), "added file");
            Ok(AddOutcome::Created(id))
        }
    }
}
