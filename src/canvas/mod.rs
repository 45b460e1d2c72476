//! Canvas module - file API access
//!
//! This module is organized into submodules:
//! - `types`: request and response payloads
//! - `client`: authenticated HTTP client

mod client;
mod types;

pub use client::CanvasClient;
pub use types::{
    FileMetadata, FolderMetadata, UploadInitResponse, UploadRequest, UploadTicket,
};
