//! Bulk download and in-place replacement of Canvas LMS course files.
//!
//! Both directions are driven by a CSV export of the course files:
//!
//! 1. **Download**: keep the rows matching the configured column filters, resolve
//!    each file id to its download URL and stream the file into the output folder.
//! 2. **Upload**: for each row, find the replacement file on disk, resolve the
//!    remote file's folder and course, and overwrite it through the Canvas upload
//!    handshake.
//!
//! Rows are processed one at a time. A failing row is logged and counted; it never
//! stops the run.

pub mod canvas;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod download;
mod error;
pub mod logging;
pub mod status;
pub mod upload;

pub use config::Config;
pub use error::{Error, Result};
