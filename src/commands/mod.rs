//! Command entry points
//!
//! One function per CLI subcommand:
//! - `download_commands`: filter the export and download matching files
//! - `upload_commands`: replace Canvas files with local copies

mod download_commands;
mod upload_commands;

pub use download_commands::run_download;
pub use upload_commands::run_upload;
