use std::fmt;

use crate::error::{Error, Result};

/// maximum encoded length of an entry name
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// stable identity of an entry within one in-memory table
///
/// ids are issued at insertion and never reused, so removing an entry never
/// changes what any other parent reference points at. they are not persisted:
/// the wire format stores table positions instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    /// reserved value, never issued (it is the wire format's no-parent marker)
    pub(crate) const RESERVED: u32 = u32::MAX;

    pub(crate) fn from_raw(raw: u32) -> Self {
        debug_assert_ne!(raw, Self::RESERVED);
        Self(raw)
    }

    /// parent marker for a reference that points outside its table
    ///
    /// built on the reserved value, so no entry can ever be issued this id
    /// and adopt the orphan.
    pub(crate) fn dangling() -> Self {
        Self(Self::RESERVED)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// location of a file's content inside the data blob
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Extent {
    pub offset: u32,
    pub size: u32,
}

impl Extent {
    pub fn new(offset: u32, size: u32) -> Self {
        Self { offset, size }
    }

    /// byte range in the blob, or None if it overflows
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        let start = self.offset as usize;
        let end = start.checked_add(self.size as usize)?;
        Some(start..end)
    }
}

/// kind of entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File(Extent),
}

impl EntryKind {
    /// get the type name for listings and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            EntryKind::Directory => "directory",
            EntryKind::File(_) => "file",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File(_))
    }

    /// content extent for files
    pub fn extent(&self) -> Option<Extent> {
        match self {
            EntryKind::File(extent) => Some(*extent),
            EntryKind::Directory => None,
        }
    }

    /// content size in bytes (0 for directories)
    pub fn size(&self) -> u32 {
        self.extent().map(|e| e.size).unwrap_or(0)
    }
}

/// a single node of the flattened forest
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub(crate) id: EntryId,
    pub name: String,
    pub parent: Option<EntryId>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }
}

/// validate a name before it enters the table
pub fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidEntryName("empty name".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidEntryName(format!(
            "name exceeds {} bytes: {}",
            MAX_NAME_LEN, name
        )));
    }
    if name.contains('/') {
        return Err(Error::InvalidEntryName(format!(
            "name contains '/': {}",
            name
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidEntryName(format!(
            "name contains null byte: {}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidEntryName(format!("reserved name: {}", name)));
    }
    Ok(())
}
