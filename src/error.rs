//! Crate-wide error type.

use thiserror::Error;

/// Every error a bulk run can produce.
///
/// Row-level variants are caught by the runners and turned into a logged skip or
/// failure; the rest abort the run before the first row is processed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Column '{0}' not found in dataset header")]
    MissingColumn(String),

    /// A Canvas endpoint answered with a non-success status.
    #[error("{step} returned status {status}: {body}")]
    UnexpectedStatus {
        step: &'static str,
        status: u16,
        body: String,
    },

    #[error("No download URL found for file ID {0}")]
    MissingDownloadUrl(u64),

    #[error("Missing 'upload_url' or 'upload_params' in initiation response")]
    MissingUploadTicket,

    #[error("Not a course folder (context_type={0})")]
    NotCourseFolder(String),

    #[error("Local file not found: {0}")]
    LocalFileMissing(String),
}

impl Error {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
