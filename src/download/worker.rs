//! Download worker - streams a response body to disk

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::types::WRITE_BUFFER_SIZE;
use crate::Result;

/// Whether a declared Content-Type contains the expected type, ignoring case. An
/// empty expectation accepts anything.
pub(crate) fn content_type_matches(declared: Option<&str>, expected: &str) -> bool {
    expected.is_empty()
        || declared
            .unwrap_or("")
            .to_ascii_lowercase()
            .contains(&expected.to_ascii_lowercase())
}

/// Warn when the response does not declare the expected content type. Returns
/// whether the type matched.
pub(crate) fn check_content_type(response: &Response, expected: &str, file_name: &str) -> bool {
    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let matches = content_type_matches(declared, expected);
    if !matches {
        log::warn!(
            "Warning: {} returned unexpected Content-Type: {}",
            file_name,
            declared.unwrap_or("")
        );
    }
    matches
}

/// Stream the body into `destination`, truncating any existing file.
///
/// Returns the number of bytes read from the stream, which is also the number of
/// bytes written. A partially written file is left in place on error.
pub(crate) async fn save_response(response: Response, destination: &Path) -> Result<u64> {
    let mut file = File::create(destination).await?;
    let mut stream = response.bytes_stream();
    let mut write_buffer = Vec::with_capacity(WRITE_BUFFER_SIZE);
    let mut bytes_read: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        bytes_read += chunk.len() as u64;
        write_buffer.extend_from_slice(&chunk);

        if write_buffer.len() >= WRITE_BUFFER_SIZE {
            file.write_all(&write_buffer).await?;
            write_buffer.clear();
        }
    }

    if !write_buffer.is_empty() {
        file.write_all(&write_buffer).await?;
    }
    file.flush().await?;

    Ok(bytes_read)
}
