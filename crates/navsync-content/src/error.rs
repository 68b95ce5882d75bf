//! Error types for navsync-content

use crate::matcher::RegionError;

/// Result type for navsync-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in navsync-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid delimiter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Delimiter {pattern:?} matches empty text")]
    EmptyDelimiter { pattern: String },

    #[error("Invalid marker rule: {message}")]
    InvalidRule { message: String },

    #[error("Reference document has no usable navigation region: {0}")]
    Reference(#[source] RegionError),
}

impl Error {
    pub fn rule(message: impl Into<String>) -> Self {
        Self::InvalidRule {
            message: message.into(),
        }
    }
}
