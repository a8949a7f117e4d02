use crate::container::Container;
use crate::error::{Error, Result};
use crate::types::{validate_entry_name, EntryId, EntryKind};

/// create a directory named `name` inside the container directory `dir_path`
///
/// fails if the parent already has a child called `name`, of either kind.
pub fn create_dir(container: &mut Container, dir_path: &str, name: &str) -> Result<EntryId> {
    validate_entry_name(name)?;
    let parent = container.table().resolve_dir(dir_path)?;

    if container.table().children_of(parent).any(|e| e.name == name) {
        return Err(Error::EntryExists(join(dir_path, name)));
    }

    let id = container
        .table_mut()
        .push(name, parent, EntryKind::Directory)?;

    tracing::debug!(dir = dir_path, name, "created directory");
    Ok(id)
}

/// logical path for messages, normalising the parent's slashes
fn join(dir_path: &str, name: &str) -> String {
    let dir = dir_path.trim_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
