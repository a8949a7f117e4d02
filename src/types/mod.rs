mod entry;

pub use entry::{validate_entry_name, Entry, EntryId, EntryKind, Extent, MAX_NAME_LEN};
