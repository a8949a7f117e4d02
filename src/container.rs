use std::io::{Read, Write};
use std::path::Path;

use crate::codec;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::{write_atomic, write_file};
use crate::table::EntryTable;
use crate::types::{Entry, EntryId};

/// an open container: the entry table plus the data blob it indexes
///
/// a working copy only. mutations through [`crate::ops`] change it in memory
/// and nothing reaches disk until [`Container::save`] is called.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    table: EntryTable,
    blob: Vec<u8>,
}

impl Container {
    /// create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// assemble a container from an existing table and blob
    pub fn from_parts(table: EntryTable, blob: Vec<u8>) -> Self {
        Self { table, blob }
    }

    /// open and decode a container file
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_path(path)?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            // a short read is a property of this file
            Error::Stream(source) => Error::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// decode a container image held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }

    /// decode a container from any reader
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let (table, blob) = codec::decode(reader)?;
        Ok(Self { table, blob })
    }

    /// encode to a complete container image
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        codec::encode_to_vec(&self.table, &self.blob)
    }

    /// encode to any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        codec::encode(&self.table, &self.blob, writer)
    }

    /// write the container to `path`, overwriting it in place
    ///
    /// an interrupted write can leave a truncated file; see [`Container::save_atomic`].
    pub fn save(&self, path: &Path) -> Result<()> {
        let image = self.to_bytes()?;
        write_file(path, &image)?;
        tracing::debug!(path = %path.display(), bytes = image.len(), "saved container");
        Ok(())
    }

    /// write the container through a temp file and rename it over `path`
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        let image = self.to_bytes()?;
        write_atomic(path, &image)?;
        tracing::debug!(path = %path.display(), bytes = image.len(), "saved container atomically");
        Ok(())
    }

    /// the entry table
    pub fn table(&self) -> &EntryTable {
        &self.table
    }

    /// the data blob
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// split into table and blob
    pub fn into_parts(self) -> (EntryTable, Vec<u8>) {
        (self.table, self.blob)
    }

    pub(crate) fn table_mut(&mut self) -> &mut EntryTable {
        &mut self.table
    }

    pub(crate) fn replace_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    /// content bytes of a file entry
    pub fn file_content(&self, id: EntryId) -> Result<&[u8]> {
        let entry = self
            .table
            .get(id)
            .ok_or_else(|| Error::PathNotFound(id.to_string()))?;
        content_of(&self.table, &self.blob, entry)
    }
}

/// slice an entry's bytes out of a blob, refusing out-of-range extents
pub(crate) fn content_of<'a>(table: &EntryTable, blob: &'a [u8], entry: &Entry) -> Result<&'a [u8]> {
    let extent = entry
        .kind
        .extent()
        .ok_or_else(|| Error::NotAFile(table.path_of(entry.id())))?;

    extent
        .range()
        .and_then(|range| blob.get(range))
        .ok_or_else(|| {
            Error::CorruptEntry(format!(
                "{}: extent {}+{} outside blob of {} bytes",
                table.path_of(entry.id()),
                extent.offset,
                extent.size,
                blob.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryKind, Extent};
    use tempfile::tempdir;

    fn sample() -> Container {
        let mut table = EntryTable::new();
        let root = table.push("root", None, EntryKind::Directory).unwrap();
        table
            .push("a.txt", Some(root), EntryKind::File(Extent::new(0, 2)))
            .unwrap();
        Container::from_parts(table, b"hi".to_vec())
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.fsfs");

        let container = sample();
        container.save(&path).unwrap();

        let reopened = Container::open(&path).unwrap();
        assert_eq!(reopened, container);
    }

    #[test]
    fn test_save_atomic_and_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.fsfs");
        std::fs::write(&path, "previous content").unwrap();

        let container = sample();
        container.save_atomic(&path).unwrap();

        assert_eq!(Container::open(&path).unwrap(), container);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = Container::open(&dir.path().join("missing.fsfs"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_open_truncated_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.fsfs");
        std::fs::write(&path, b"FSFSYS").unwrap();

        match Container::open(&path) {
            Err(Error::Io { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_rejects_foreign_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("foreign.bin");
        std::fs::write(&path, b"PK\x03\x04 not ours at all").unwrap();

        assert!(matches!(Container::open(&path), Err(Error::BadMagic)));
    }

    #[test]
    fn test_file_content() {
        let container = sample();
        let a = container.table().resolve("root/a.txt").unwrap();
        let root = container.table().resolve("root").unwrap();

        assert_eq!(container.file_content(a).unwrap(), b"hi");
        assert!(matches!(
            container.file_content(root),
            Err(Error::NotAFile(_))
        ));
    }

    #[test]
    fn test_file_content_out_of_range() {
        let mut table = EntryTable::new();
        let f = table
            .push("f", None, EntryKind::File(Extent::new(1, 10)))
            .unwrap();
        let container = Container::from_parts(table, b"abc".to_vec());

        assert!(matches!(
            container.file_content(f),
            Err(Error::CorruptEntry(_))
        ));
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let container = sample();
        let mut out = Vec::new();
        container.write_to(&mut out).unwrap();
        assert_eq!(out, container.to_bytes().unwrap());
        assert_eq!(Container::from_bytes(&out).unwrap(), container);
    }
}
