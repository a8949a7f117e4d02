//! full blob reconstruction shared by the content-changing mutations

use crate::container::{content_of, Container};
use crate::error::{Error, Result};
use crate::table::EntryTable;
use crate::types::{EntryId, EntryKind, Extent};

/// the one content change a rebuild applies
#[derive(Clone, Copy, Debug)]
pub(crate) enum BlobChange<'a> {
    /// new content for an existing file entry
    Write(EntryId, &'a [u8]),
    /// drop a file entry's content
    Drop(EntryId),
}

/// a freshly built blob and the extents that index it
#[derive(Debug)]
pub(crate) struct Layout {
    blob: Vec<u8>,
    extents: Vec<(EntryId, Extent)>,
}

impl Layout {
    /// install the new blob and every new extent
    pub(crate) fn apply(self, container: &mut Container) {
        let table = container.table_mut();
        for (id, extent) in self.extents {
            table.set_extent(id, extent);
        }
        container.replace_blob(self.blob);
    }
}

/// rebuild the blob in table order with `change` applied
///
/// pure: nothing is modified, so a failure here leaves the container intact.
pub(crate) fn compact(table: &EntryTable, blob: &[u8], change: BlobChange<'_>) -> Result<Layout> {
    rebuild(table, blob, Some(change))
}

/// rebuild the blob with no content change, dropping holes and stale bytes
pub(crate) fn repack(table: &EntryTable, blob: &[u8]) -> Result<Layout> {
    rebuild(table, blob, None)
}

/// rebuild the blob unchanged, then place `content` at its end
///
/// the returned extent belongs to a file entry the caller appends to the
/// table, which keeps blob order equal to table order.
pub(crate) fn compact_append(
    table: &EntryTable,
    blob: &[u8],
    content: &[u8],
) -> Result<(Layout, Extent)> {
    let mut layout = rebuild(table, blob, None)?;
    let extent = place(&mut layout.blob, content)?;
    Ok((layout, extent))
}

fn rebuild(table: &EntryTable, blob: &[u8], change: Option<BlobChange<'_>>) -> Result<Layout> {
    let mut new_blob = Vec::with_capacity(blob.len());
    let mut extents = Vec::new();

    for entry in table {
        if !matches!(entry.kind, EntryKind::File(_)) {
            continue;
        }

        let content = match change {
            Some(BlobChange::Write(id, data)) if id == entry.id() => data,
            Some(BlobChange::Drop(id)) if id == entry.id() => continue,
            _ => content_of(table, blob, entry)?,
        };

        let extent = place(&mut new_blob, content)?;
        extents.push((entry.id(), extent));
    }

    Ok(Layout {
        blob: new_blob,
        extents,
    })
}

/// append content to the blob under construction, returning where it landed
pub(crate) fn place(blob: &mut Vec<u8>, content: &[u8]) -> Result<Extent> {
    let offset = to_u32(blob.len(), "blob offset")?;
    let size = to_u32(content.len(), "file size")?;
    to_u32(blob.len() + content.len(), "blob size")?;

    blob.extend_from_slice(content);
    Ok(Extent::new(offset, size))
}

fn to_u32(n: usize, what: &str) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::CapacityExceeded(format!("{} of {} bytes", what, n)))
}
