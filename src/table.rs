//! the entry table: a forest flattened into an ordered list
//!
//! hierarchy is expressed through parent references. table order is
//! insertion order and is preserved exactly by the wire codec. because ids are
//! issued monotonically and entries are only ever appended, the table is
//! always sorted by id, which makes identity lookup a binary search.

use crate::error::{Error, Result};
use crate::types::{Entry, EntryId, EntryKind, Extent};

/// ordered list of entries for one container
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryTable {
    entries: Vec<Entry>,
    next_id: u32,
}

impl EntryTable {
    /// create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is table empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// entries in table order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// table position of a specific entry, by identity
    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// look up an entry by id
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.index_of(id).map(|i| &self.entries[i])
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        let idx = self.index_of(id)?;
        Some(&mut self.entries[idx])
    }

    /// entries whose parent is `parent` (None = implicit root), in table order
    ///
    /// linear scan; recursive traversal of the whole table is quadratic.
    pub fn children_of(&self, parent: Option<EntryId>) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().filter(move |e| e.parent == parent)
    }

    /// does any entry name `id` as its parent
    pub fn has_children(&self, id: EntryId) -> bool {
        self.children_of(Some(id)).next().is_some()
    }

    /// append an entry at the end of the table
    pub fn push(
        &mut self,
        name: impl Into<String>,
        parent: Option<EntryId>,
        kind: EntryKind,
    ) -> Result<EntryId> {
        // the entry count is a u32 on the wire and NO_PARENT must stay unused
        if self.next_id == EntryId::RESERVED || self.entries.len() >= EntryId::RESERVED as usize {
            return Err(Error::CapacityExceeded("entry table is full".to_string()));
        }

        let id = EntryId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            name: name.into(),
            parent,
            kind,
        });
        Ok(id)
    }

    /// remove an entry, leaving every other reference untouched
    pub(crate) fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let idx = self.index_of(id)?;
        Some(self.entries.remove(idx))
    }

    pub(crate) fn set_extent(&mut self, id: EntryId, extent: Extent) {
        if let Some(entry) = self.get_mut(id) {
            entry.kind = EntryKind::File(extent);
        }
    }

    /// logical path of an entry, slash-joined from the implicit root
    pub fn path_of(&self, id: EntryId) -> String {
        let mut names = Vec::new();
        let mut current = self.get(id);

        // bounded so a corrupt parent cycle cannot loop forever
        while let Some(entry) = current {
            if names.len() > self.entries.len() {
                break;
            }
            names.push(entry.name.as_str());
            current = entry.parent.and_then(|p| self.get(p));
        }

        names.reverse();
        names.join("/")
    }

    /// resolve a logical path to an entry of any kind
    ///
    /// the empty path names the implicit root, which is not an entry.
    pub fn resolve(&self, path: &str) -> Result<EntryId> {
        match self.walk(path, false) {
            Some(Some(id)) => Ok(id),
            _ => Err(Error::PathNotFound(path.to_string())),
        }
    }

    /// resolve a logical path that must denote a directory
    ///
    /// returns None for the implicit root (`""` or `"/"`).
    pub fn resolve_dir(&self, path: &str) -> Result<Option<EntryId>> {
        self.walk(path, true)
            .ok_or_else(|| Error::DirectoryNotFound(path.to_string()))
    }

    /// segment-by-segment walk, first match in table order wins
    fn walk(&self, path: &str, dirs_only: bool) -> Option<Option<EntryId>> {
        let mut current = None;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let next = self
                .children_of(current)
                .find(|e| e.name == segment && (!dirs_only || e.is_directory()))?;
            current = Some(next.id);
        }

        Some(current)
    }

    /// rebuild a table from decoded records, using positions as ids
    ///
    /// a parent position outside the table is kept as a dangling reference,
    /// never as a raw id that a later `push` could hand out again.
    pub(crate) fn from_records(records: Vec<(String, Option<u32>, EntryKind)>) -> Self {
        let len = records.len();
        let entries: Vec<Entry> = records
            .into_iter()
            .enumerate()
            .map(|(pos, (name, parent, kind))| {
                let parent = parent.map(|raw| {
                    if (raw as usize) < len {
                        EntryId::from_raw(raw)
                    } else {
                        tracing::warn!(entry = pos, parent = raw, "dangling parent reference");
                        EntryId::dangling()
                    }
                });
                Entry {
                    id: EntryId::from_raw(pos as u32),
                    name,
                    parent,
                    kind,
                }
            })
            .collect();

        Self {
            next_id: entries.len() as u32,
            entries,
        }
    }

    /// do both tables encode to the same records
    ///
    /// compares names, kinds and parent positions in table order. entry ids
    /// and the id counter are ignored, since the wire format only carries
    /// positions.
    pub fn same_layout(&self, other: &EntryTable) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| {
                a.name == b.name
                    && a.kind == b.kind
                    && self.parent_position(a) == other.parent_position(b)
            })
    }

    /// None for the implicit root, Some(None) for a dangling reference
    fn parent_position(&self, entry: &Entry) -> Option<Option<usize>> {
        entry.parent.map(|p| self.index_of(p))
    }
}

impl<'a> IntoIterator for &'a EntryTable {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root/
    ///   a.txt
    ///   sub/
    ///     b.txt
    fn sample() -> (EntryTable, EntryId, EntryId, EntryId, EntryId) {
        let mut t = EntryTable::new();
        let root = t.push("root", None, EntryKind::Directory).unwrap();
        let a = t
            .push("a.txt", Some(root), EntryKind::File(Extent::new(0, 2)))
            .unwrap();
        let sub = t.push("sub", Some(root), EntryKind::Directory).unwrap();
        let b = t
            .push("b.txt", Some(sub), EntryKind::File(Extent::new(2, 2)))
            .unwrap();
        (t, root, a, sub, b)
    }

    #[test]
    fn test_children_of_preserves_order() {
        let (t, root, ..) = sample();
        let names: Vec<_> = t.children_of(Some(root)).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "sub"]);

        let top: Vec<_> = t.children_of(None).map(|e| e.name.as_str()).collect();
        assert_eq!(top, vec!["root"]);
    }

    #[test]
    fn test_index_of_uses_identity() {
        let mut t = EntryTable::new();
        let first = t.push("same", None, EntryKind::Directory).unwrap();
        let second = t.push("same", None, EntryKind::Directory).unwrap();

        assert_eq!(t.index_of(first), Some(0));
        assert_eq!(t.index_of(second), Some(1));
    }

    #[test]
    fn test_resolve_paths() {
        let (t, root, a, sub, b) = sample();

        assert_eq!(t.resolve("root").unwrap(), root);
        assert_eq!(t.resolve("/root/a.txt").unwrap(), a);
        assert_eq!(t.resolve("root/sub/").unwrap(), sub);
        assert_eq!(t.resolve("//root//sub/b.txt").unwrap(), b);
    }

    #[test]
    fn test_resolve_not_found_keeps_input() {
        let (t, ..) = sample();

        match t.resolve("root/missing") {
            Err(Error::PathNotFound(p)) => assert_eq!(p, "root/missing"),
            other => panic!("expected PathNotFound, got {:?}", other),
        }
        assert!(matches!(t.resolve(""), Err(Error::PathNotFound(_))));
        assert!(matches!(t.resolve("/"), Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_resolve_dir() {
        let (t, root, _, sub, _) = sample();

        assert_eq!(t.resolve_dir("").unwrap(), None);
        assert_eq!(t.resolve_dir("/").unwrap(), None);
        assert_eq!(t.resolve_dir("root").unwrap(), Some(root));
        assert_eq!(t.resolve_dir("root/sub").unwrap(), Some(sub));

        // files never satisfy a directory lookup
        assert!(matches!(
            t.resolve_dir("root/a.txt"),
            Err(Error::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let mut t = EntryTable::new();
        let first = t.push("dup", None, EntryKind::Directory).unwrap();
        t.push("dup", None, EntryKind::Directory).unwrap();

        assert_eq!(t.resolve("dup").unwrap(), first);
    }

    #[test]
    fn test_resolve_dir_skips_same_named_file() {
        let mut t = EntryTable::new();
        t.push("x", None, EntryKind::File(Extent::default())).unwrap();
        let dir = t.push("x", None, EntryKind::Directory).unwrap();

        assert_eq!(t.resolve_dir("x").unwrap(), Some(dir));
        assert_ne!(t.resolve("x").unwrap(), dir);
    }

    #[test]
    fn test_remove_keeps_other_references() {
        let (mut t, root, a, sub, b) = sample();

        t.remove(a).unwrap();

        assert_eq!(t.len(), 3);
        assert_eq!(t.get(b).unwrap().parent, Some(sub));
        assert_eq!(t.get(sub).unwrap().parent, Some(root));
        assert_eq!(t.resolve("root/sub/b.txt").unwrap(), b);
        assert!(t.get(a).is_none());
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut t = EntryTable::new();
        let a = t.push("a", None, EntryKind::Directory).unwrap();
        t.remove(a);
        let b = t.push("b", None, EntryKind::Directory).unwrap();

        assert_ne!(a, b);
        assert_eq!(t.index_of(b), Some(0));
    }

    #[test]
    fn test_path_of() {
        let (t, root, _, _, b) = sample();
        assert_eq!(t.path_of(root), "root");
        assert_eq!(t.path_of(b), "root/sub/b.txt");
    }

    #[test]
    fn test_has_children() {
        let (t, root, a, ..) = sample();
        assert!(t.has_children(root));
        assert!(!t.has_children(a));
    }

    #[test]
    fn test_dangling_parent_never_adopted() {
        let mut t = EntryTable::from_records(vec![
            ("d".to_string(), None, EntryKind::Directory),
            ("orphan".to_string(), Some(2), EntryKind::Directory),
        ]);
        let orphan = t.entries()[1].id();

        // the next issued id equals the raw dangling position
        let fresh = t.push("fresh", None, EntryKind::Directory).unwrap();

        assert_eq!(fresh.as_u32(), 2);
        assert_ne!(t.get(orphan).unwrap().parent, Some(fresh));
        assert!(!t.has_children(fresh));
        assert!(t.resolve("fresh/orphan").is_err());
    }

    #[test]
    fn test_same_layout_ignores_ids() {
        let (mut t, _, a, ..) = sample();
        t.remove(a);

        // same records, ids issued from zero
        let mut fresh = EntryTable::new();
        let root = fresh.push("root", None, EntryKind::Directory).unwrap();
        let sub = fresh.push("sub", Some(root), EntryKind::Directory).unwrap();
        fresh
            .push("b.txt", Some(sub), EntryKind::File(Extent::new(2, 2)))
            .unwrap();

        assert_ne!(t, fresh);
        assert!(t.same_layout(&fresh));
        assert!(fresh.same_layout(&t));

        fresh.push("extra", None, EntryKind::Directory).unwrap();
        assert!(!t.same_layout(&fresh));
    }

    #[test]
    fn test_same_layout_compares_parent_positions() {
        let mut a = EntryTable::new();
        let x = a.push("x", None, EntryKind::Directory).unwrap();
        a.push("y", None, EntryKind::Directory).unwrap();
        a.push("z", Some(x), EntryKind::Directory).unwrap();

        let mut b = EntryTable::new();
        b.push("x", None, EntryKind::Directory).unwrap();
        let y = b.push("y", None, EntryKind::Directory).unwrap();
        b.push("z", Some(y), EntryKind::Directory).unwrap();

        assert!(!a.same_layout(&b));
    }
}
