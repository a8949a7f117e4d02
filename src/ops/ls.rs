use std::fmt;

use crate::container::Container;
use crate::table::EntryTable;
use crate::types::{Entry, EntryId, EntryKind};

/// one line of a container listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: EntryId,
    /// nesting below the listed path, 0 for its direct children
    pub depth: usize,
    /// full logical path
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.depth);
        match self.kind {
            EntryKind::Directory => write!(f, "{}[D] {}", indent, self.name),
            EntryKind::File(extent) => {
                write!(f, "{}[F] {} ({} bytes)", indent, self.name, extent.size)
            }
        }
    }
}

/// list everything below `path`, depth-first in table order
///
/// an empty path or `/` lists the whole container. a file path lists just
/// that file.
pub fn list(container: &Container, path: &str) -> crate::Result<Vec<ListEntry>> {
    let table = container.table();
    let mut out = Vec::new();

    if path.trim_matches('/').is_empty() {
        walk(table, None, 0, &mut out);
        return Ok(out);
    }

    let id = table.resolve(path)?;
    match table.get(id) {
        Some(entry) if entry.is_file() => out.push(list_entry(table, entry, 0)),
        Some(_) => walk(table, Some(id), 0, &mut out),
        None => {}
    }
    Ok(out)
}

fn walk(table: &EntryTable, parent: Option<EntryId>, depth: usize, out: &mut Vec<ListEntry>) {
    for child in table.children_of(parent) {
        out.push(list_entry(table, child, depth));
        if child.is_directory() {
            walk(table, Some(child.id()), depth + 1, out);
        }
    }
}

fn list_entry(table: &EntryTable, entry: &Entry, depth: usize) -> ListEntry {
    ListEntry {
        id: entry.id(),
        depth,
        path: table.path_of(entry.id()),
        name: entry.name.clone(),
        kind: entry.kind,
    }
}
