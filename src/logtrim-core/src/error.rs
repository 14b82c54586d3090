//! Error types for logtrim-core.

use std::path::PathBuf;
use thiserror::Error;

/// Retention error types.
#[derive(Debug, Error)]
pub enum TrimError {
    /// The retention limits are missing, duplicated, or out of range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An age or size string could not be parsed.
    #[error("Invalid quantity '{input}': {reason}")]
    InvalidQuantity { input: String, reason: String },

    /// The file name pattern is not a valid regular expression.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The pattern matched no files in the target directory.
    #[error("No files found in {}. Exiting", dir.display())]
    EmptyCandidateSet { dir: PathBuf },

    /// Every candidate was excluded and deleting everything was not allowed.
    #[error("No valid set of files to keep found. Exiting")]
    NoViableRetention,

    /// IO error during scanning or deletion.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrimError {
    pub(crate) fn invalid_quantity(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidQuantity {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for retention operations.
pub type Result<T> = std::result::Result<T, TrimError>;
