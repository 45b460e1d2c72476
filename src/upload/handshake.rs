//! Transfer half of the Canvas upload handshake

use reqwest::header::LOCATION;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::Path;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::types::TransferOutcome;
use crate::canvas::{CanvasClient, UploadTicket};
use crate::{Error, Result};

fn is_accepted(status: u16) -> bool {
    status == 200 || status == 201
}

/// Build the multipart form: ticket parameters first, file part last.
async fn build_form(
    ticket: &UploadTicket,
    local_path: &Path,
    file_name: &str,
    content_type: &str,
    size: u64,
) -> Result<Form> {
    let file = File::open(local_path).await?;
    let body = Body::wrap_stream(ReaderStream::new(file));
    let part = Part::stream_with_length(body, size)
        .file_name(file_name.to_string())
        .mime_str(content_type)?;

    let form = ticket
        .params
        .iter()
        .fold(Form::new(), |form, (key, value)| {
            form.text(key.clone(), value.clone())
        });
    Ok(form.part("file", part))
}

/// Send the file to the ticket's upload URL.
///
/// 200/201 is a success. A redirect is followed once with the bearer credential
/// and succeeds iff the confirmation returns 200/201. Everything else is an error.
pub(crate) async fn transfer(
    client: &CanvasClient,
    ticket: &UploadTicket,
    local_path: &Path,
    file_name: &str,
    content_type: &str,
    size: u64,
) -> Result<TransferOutcome> {
    let form = build_form(ticket, local_path, file_name, content_type, size).await?;
    let response = client.send_upload(ticket, form).await?;
    let status = response.status();
    log::info!("[Upload] Status: {}", status.as_u16());

    if is_accepted(status.as_u16()) {
        let body = response.text().await.unwrap_or_default();
        log::debug!("[Upload] Body: {}", body);
        return Ok(TransferOutcome::Stored {
            status: status.as_u16(),
        });
    }

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|loc| response.url().join(loc).ok());
        let Some(location) = location else {
            return Err(Error::UnexpectedStatus {
                step: "Upload transfer",
                status: status.as_u16(),
                body: "redirect without a usable Location header".to_string(),
            });
        };

        let confirm = client.confirm_upload(location).await?;
        let confirm_status = confirm.status().as_u16();
        let body = confirm.text().await.unwrap_or_default();
        log::info!("[Redirect] Status: {}", confirm_status);
        log::debug!("[Redirect] Body: {}", body);

        if is_accepted(confirm_status) {
            return Ok(TransferOutcome::Confirmed {
                status: status.as_u16(),
                confirm_status,
            });
        }
        return Err(Error::UnexpectedStatus {
            step: "Upload confirmation",
            status: confirm_status,
            body,
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::UnexpectedStatus {
        step: "Upload transfer",
        status: status.as_u16(),
        body,
    })
}
