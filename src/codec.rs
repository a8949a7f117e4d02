//! container wire format
//!
//! ```text
//! magic        6 bytes  "FSFSYS"
//! version      u8       must be VERSION
//! entry count  u32 le
//! entries      count x record
//!   name len   u8
//!   name       utf-8, name len bytes
//!   is dir     u8       1 = directory, anything else = file
//!   parent     u32 le   table position, NO_PARENT for top-level
//!   size       u32 le
//!   offset     u32 le
//! blob         every remaining byte
//! ```

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::table::EntryTable;
use crate::types::{EntryKind, Extent};

pub const MAGIC: &[u8; 6] = b"FSFSYS";
pub const VERSION: u8 = 1;

/// parent index marking a child of the implicit root
pub const NO_PARENT: u32 = 0xFFFF_FFFF;

const HEADER_LEN: usize = 6 + 1 + 4;
const RECORD_FIXED_LEN: usize = 1 + 1 + 4 + 4 + 4;

/// fixed-size container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub entry_count: u32,
}

impl Header {
    pub fn new(entry_count: u32) -> Self {
        Self {
            version: VERSION,
            entry_count,
        }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u8(self.version)?;
        writer.write_u32::<LittleEndian>(self.entry_count)?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 6];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::BadMagic);
        }
        let version = reader.read_u8()?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let entry_count = reader.read_u32::<LittleEndian>()?;
        Ok(Self {
            version,
            entry_count,
        })
    }
}

/// encode a table and blob into a complete container image
///
/// parent ids are translated to table positions here. fails without producing
/// any output if a name is too long or a parent reference is dangling.
pub fn encode_to_vec(table: &EntryTable, blob: &[u8]) -> Result<Vec<u8>> {
    let count = u32::try_from(table.len())
        .map_err(|_| Error::CapacityExceeded(format!("{} entries", table.len())))?;

    let names_len: usize = table.iter().map(|e| e.name.len()).sum();
    let mut buf =
        Vec::with_capacity(HEADER_LEN + table.len() * RECORD_FIXED_LEN + names_len + blob.len());

    Header::new(count).write(&mut buf)?;

    for entry in table {
        let name = entry.name.as_bytes();
        let name_len = u8::try_from(name.len()).map_err(|_| {
            Error::InvalidEntryName(format!("name exceeds 255 bytes: {}", entry.name))
        })?;

        let parent = match entry.parent {
            None => NO_PARENT,
            Some(id) => {
                let pos = table.index_of(id).ok_or_else(|| {
                    Error::CorruptEntry(format!(
                        "{} references missing parent {}",
                        entry.name, id
                    ))
                })?;
                pos as u32
            }
        };

        let (flag, extent) = match entry.kind {
            EntryKind::Directory => (1u8, Extent::default()),
            EntryKind::File(extent) => (0u8, extent),
        };

        buf.write_u8(name_len)?;
        buf.write_all(name)?;
        buf.write_u8(flag)?;
        buf.write_u32::<LittleEndian>(parent)?;
        buf.write_u32::<LittleEndian>(extent.size)?;
        buf.write_u32::<LittleEndian>(extent.offset)?;
    }

    buf.extend_from_slice(blob);
    Ok(buf)
}

/// encode a table and blob to a writer
pub fn encode<W: Write>(table: &EntryTable, blob: &[u8], mut writer: W) -> Result<()> {
    let image = encode_to_vec(table, blob)?;
    writer.write_all(&image)?;
    writer.flush()?;
    Ok(())
}

/// decode a container image
///
/// reads exactly `entry_count` records, then takes every remaining byte as
/// the blob. parent positions are not validated here.
pub fn decode<R: Read>(mut reader: R) -> Result<(EntryTable, Vec<u8>)> {
    let header = Header::read(&mut reader)?;

    // no preallocation from the untrusted count
    let mut records = Vec::new();
    for pos in 0..header.entry_count {
        let name_len = reader.read_u8()? as usize;
        let mut name = vec![0u8; name_len];
        reader.read_exact(&mut name)?;
        let name = String::from_utf8(name)
            .map_err(|_| Error::InvalidFormat(format!("entry {} has a non-utf8 name", pos)))?;

        let is_dir = reader.read_u8()? == 1;
        let parent = reader.read_u32::<LittleEndian>()?;
        let size = reader.read_u32::<LittleEndian>()?;
        let offset = reader.read_u32::<LittleEndian>()?;

        let kind = if is_dir {
            EntryKind::Directory
        } else {
            EntryKind::File(Extent::new(offset, size))
        };
        let parent = (parent != NO_PARENT).then_some(parent);

        records.push((name, parent, kind));
    }

    let mut blob = Vec::new();
    reader.read_to_end(&mut blob)?;

    tracing::debug!(
        entries = records.len(),
        blob_len = blob.len(),
        "decoded container"
    );

    Ok((EntryTable::from_records(records), blob))
}
