//! fsfs - single-file directory container
//!
//! packs a directory tree (names, hierarchy and file contents) into one flat
//! file, and edits that file in place without re-packing from disk.
//!
//! # Core concepts
//!
//! - **Entry**: a named file or directory with an optional parent
//! - **Entry table**: every entry in one ordered list; the hierarchy lives in
//!   parent references, not in nesting
//! - **Blob**: the concatenated file contents, indexed by each file's extent
//! - **Logical path**: `/`-separated names starting below the implicit root
//!
//! # File format
//!
//! `"FSFSYS" | version | entry count | entries... | blob`, little-endian.
//! see [`codec`] for the record layout.
//!
//! # Example usage
//!
//! ```no_run
//! use fsfs::{ops, Container};
//! use std::path::Path;
//!
//! // pack a directory
//! let mut container = ops::pack(Path::new("/source"), &ops::PackOptions::default()).unwrap();
//!
//! // edit it
//! ops::add_file(&mut container, "source", "notes.txt", b"hello").unwrap();
//! ops::delete(&mut container, "source/old.log").unwrap();
//! container.save_atomic(Path::new("/tmp/source.fsfs")).unwrap();
//!
//! // and get a file back out
//! let container = Container::open(Path::new("/tmp/source.fsfs")).unwrap();
//! ops::extract_subtree(
//!     &container,
//!     "source/notes.txt",
//!     Path::new("/destination"),
//!     &ops::ExtractOptions::default(),
//! )
//! .unwrap();
//! ```

mod config;
mod container;
mod error;
mod table;

pub mod codec;
pub mod fs;
pub mod ops;
pub mod types;

pub use config::{Config, ExtractOptions, PackOptions};
pub use container::Container;
pub use error::{Error, IoResultExt, Result};
pub use table::EntryTable;
pub use types::{validate_entry_name, Entry, EntryId, EntryKind, Extent, MAX_NAME_LEN};
