//! Error types for navsync-core

use std::path::PathBuf;

/// Result type for navsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in navsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Manifest parsed but describes an unusable configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Explicitly requested manifest does not exist
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// The reference page could not be read
    #[error("Cannot read reference document {path}: {source}")]
    ReferenceUnreadable {
        path: PathBuf,
        #[source]
        source: navsync_fs::Error,
    },

    /// Content error from navsync-content
    #[error(transparent)]
    Content(#[from] navsync_content::Error),

    /// Filesystem error from navsync-fs
    #[error(transparent)]
    Fs(#[from] navsync_fs::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
