//! container statistics

use crate::container::Container;
use crate::types::EntryKind;

/// container statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContainerStats {
    pub entries: usize,
    pub files: usize,
    pub dirs: usize,
    pub blob_len: u64,
    /// sum of file sizes; differs from `blob_len` only for hand-built or damaged images
    pub content_bytes: u64,
}

/// collect container statistics
pub fn stats(container: &Container) -> ContainerStats {
    let mut s = ContainerStats {
        entries: container.table().len(),
        blob_len: container.blob().len() as u64,
        ..Default::default()
    };

    for entry in container.table() {
        match entry.kind {
            EntryKind::Directory => s.dirs += 1,
            EntryKind::File(extent) => {
                s.files += 1;
                s.content_bytes += u64::from(extent.size);
            }
        }
    }

    s
}
