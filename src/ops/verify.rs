use std::collections::HashSet;
use std::fmt;

use crate::container::Container;
use crate::types::{EntryId, EntryKind};

/// structural check report
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// entries checked
    pub entries_checked: usize,
    /// parent reference names no entry
    pub dangling_parents: Vec<Issue>,
    /// parent reference names a file
    pub file_parents: Vec<Issue>,
    /// file extent reaches past the end of the blob
    pub bad_extents: Vec<Issue>,
    /// no chain of directories leads from the root to the entry
    pub unreachable: Vec<Issue>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.dangling_parents.is_empty()
            && self.file_parents.is_empty()
            && self.bad_extents.is_empty()
            && self.unreachable.is_empty()
    }

    /// every issue, in report order
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.dangling_parents
            .iter()
            .chain(&self.file_parents)
            .chain(&self.bad_extents)
            .chain(&self.unreachable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: EntryId,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.id, self.path, self.message)
    }
}

/// check the entry table against itself and the blob
pub fn verify(container: &Container) -> VerifyReport {
    let table = container.table();
    let blob_len = container.blob().len();
    let mut report = VerifyReport {
        entries_checked: table.len(),
        ..Default::default()
    };

    let issue = |id: EntryId, message: String| Issue {
        id,
        path: table.path_of(id),
        message,
    };

    for entry in table {
        if let Some(parent) = entry.parent {
            match table.get(parent) {
                None => report
                    .dangling_parents
                    .push(issue(entry.id(), "parent is outside the table".to_string())),
                Some(p) if p.is_file() => report
                    .file_parents
                    .push(issue(entry.id(), format!("parent {} is a file", parent))),
                Some(_) => {}
            }
        }

        if let EntryKind::File(extent) = entry.kind {
            let in_bounds = extent.range().is_some_and(|r| r.end <= blob_len);
            if !in_bounds {
                report.bad_extents.push(issue(
                    entry.id(),
                    format!(
                        "extent {}+{} outside blob of {} bytes",
                        extent.offset, extent.size, blob_len
                    ),
                ));
            }
        }
    }

    // mark everything reachable through directories from the root
    let mut reachable = HashSet::new();
    let mut stack: Vec<Option<EntryId>> = vec![None];
    while let Some(parent) = stack.pop() {
        for child in table.children_of(parent) {
            if reachable.insert(child.id()) && child.is_directory() {
                stack.push(Some(child.id()));
            }
        }
    }

    for entry in table {
        if !reachable.contains(&entry.id()) {
            report
                .unreachable
                .push(issue(entry.id(), "not reachable from the root".to_string()));
        }
    }

    tracing::debug!(
        entries = report.entries_checked,
        issues = report.issues().count(),
        "verified container"
    );
    report
}
