use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};

/// tool configuration, usually read from a toml file
///
/// ```toml
/// [pack]
/// include_hidden = false
///
/// [extract]
/// overwrite = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pack: PackOptions,
    pub extract: ExtractOptions,
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        Self::from_toml(&content)
    }

    /// parse config from a toml string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

/// options for packing a directory tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackOptions {
    /// pack dot-files and dot-directories
    pub include_hidden: bool,
    /// pack symlinked files and directories as their targets
    pub follow_symlinks: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            include_hidden: true,
            follow_symlinks: true,
        }
    }
}

/// options for extracting entries to disk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// replace files that already exist at the destination
    pub overwrite: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { overwrite: true }
    }
}
