use std::path::PathBuf;

/// error type for fsfs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not an fsfs container: bad magic")]
    BadMagic,

    #[error("unsupported container version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid container format: {0}")]
    InvalidFormat(String),

    #[error("path not found in container: {0}")]
    PathNotFound(String),

    #[error("directory not found in container: {0}")]
    DirectoryNotFound(String),

    #[error("entry already exists: {0}")]
    EntryExists(String),

    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("extraction target already exists: {0}")]
    TargetExists(PathBuf),

    #[error("container limit exceeded: {0}")]
    CapacityExceeded(String),

    #[error("corrupt entry: {0}")]
    CorruptEntry(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stream error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
