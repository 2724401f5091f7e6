//! Crate-level error type.
//!
//! Outline extraction and tracking never fail; errors only come from the
//! surroundings: reading files, loading configuration and watching for
//! changes.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config file passed explicitly does not exist.
    #[error("config not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// A config file exists but is not valid TOML for [`crate::Config`].
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// No platform config directory could be determined.
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("file watcher: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
