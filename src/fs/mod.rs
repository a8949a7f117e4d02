//! local filesystem access used by pack, extract and save

pub mod read;
pub mod write;

pub use read::{read_file, walk_sorted, WalkedEntry, WalkedKind};
pub use write::{create_dir_all, fsync_dir, write_atomic, write_file};
