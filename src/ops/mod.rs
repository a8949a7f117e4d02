//! high-level operations on fsfs containers

mod add;
mod compact;
mod extract;
mod ls;
mod mkdir;
mod pack;
mod remove;
mod rename;
mod stats;
mod verify;

pub use crate::config::{ExtractOptions, PackOptions};
pub use add::{add_file, AddOutcome};
pub use extract::{extract_all, extract_subtree};
pub use ls::{list, ListEntry};
pub use mkdir::create_dir;
pub use pack::pack;
pub use remove::delete;
pub use rename::rename;
pub use stats::{stats, ContainerStats};
pub use verify::{verify, Issue, VerifyReport};
