//! In-place replacement of Canvas files from local copies
//!
//! Each row resolves file → folder → course, then runs the two-step upload
//! handshake with `on_duplicate=overwrite`.

mod handshake;
mod runner;
mod types;

pub use runner::Uploader;
pub use types::{TransferOutcome, UploadSummary};
