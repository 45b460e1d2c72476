//! Bulk download of Canvas files listed in a CSV export
//!
//! Provides the download side of a run with:
//! - Configurable column filters and an optional duplicate-name pre-pass
//! - Streaming downloads written through a buffer
//! - Size verification against the reported file size

mod runner;
mod types;
mod worker;

pub use runner::Downloader;
pub use types::{DownloadSummary, DownloadedFile, DuplicateSkip};
