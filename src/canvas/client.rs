//! Authenticated Canvas REST client

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{redirect, Client, Response, Url};
use std::time::Duration;

use super::types::{FileMetadata, FolderMetadata, UploadInitResponse, UploadRequest, UploadTicket};
use crate::config::CanvasConfig;
use crate::{Error, Result};

const CLIENT_USER_AGENT: &str = concat!("canvas-bulkflow/", env!("CARGO_PKG_VERSION"));

/// Canvas API access for one run.
///
/// Holds three HTTP clients. `api` carries the total timeout for the JSON calls.
/// `download` follows redirects (download URLs bounce to a file store) and only
/// limits connecting and idle reads, so a large body can take as long as it needs.
/// `transfer` never follows redirects, so the upload handshake can see the redirect
/// to the confirmation URL.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    api: Client,
    download: Client,
    transfer: Client,
    base_url: String,
    auth: HeaderValue,
}

impl CanvasClient {
    pub fn new(config: &CanvasConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|_| Error::Config("canvas.token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let timeout = Duration::from_secs(config.timeout_secs);
        let api = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .timeout(timeout)
            .build()?;
        let download = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        let transfer = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            api,
            download,
            transfer,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth.clone());
        headers
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// Fetch file metadata. Any status other than 200 is an error.
    pub async fn get_file(&self, file_id: u64) -> Result<FileMetadata> {
        let response = self
            .api
            .get(self.api_url(&format!("files/{}", file_id)))
            .headers(self.auth_headers())
            .send()
            .await?;
        let response = ensure_status("File metadata", response, &[200]).await?;
        Ok(response.json().await?)
    }

    /// Fetch folder metadata. Any status other than 200 is an error.
    pub async fn get_folder(&self, folder_id: u64) -> Result<FolderMetadata> {
        let response = self
            .api
            .get(self.api_url(&format!("folders/{}", folder_id)))
            .headers(self.auth_headers())
            .send()
            .await?;
        let response = ensure_status("Folder metadata", response, &[200]).await?;
        Ok(response.json().await?)
    }

    /// Start streaming a file's content. The caller consumes the body.
    pub async fn open_download(&self, url: &str) -> Result<Response> {
        let response = self
            .download
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await?;
        ensure_status("Download", response, &[200]).await
    }

    /// First half of the upload handshake.
    pub async fn initiate_upload(
        &self,
        course_id: u64,
        request: &UploadRequest,
    ) -> Result<UploadTicket> {
        let response = self
            .api
            .post(self.api_url(&format!("courses/{}/files", course_id)))
            .headers(self.auth_headers())
            .json(request)
            .send()
            .await?;
        let response = ensure_status("Upload initiation", response, &[200, 201]).await?;
        let body = response.text().await?;
        log::debug!("[Initiate] Body: {}", body);

        let init: UploadInitResponse = serde_json::from_str(&body).unwrap_or_default();
        init.into_ticket().ok_or(Error::MissingUploadTicket)
    }

    /// Second half of the handshake: post the form to the one-time URL without the
    /// bearer credential. The raw response is returned so redirects can be inspected.
    pub async fn send_upload(&self, ticket: &UploadTicket, form: Form) -> Result<Response> {
        Ok(self
            .transfer
            .post(&ticket.upload_url)
            .multipart(form)
            .send()
            .await?)
    }

    /// Follow an upload redirect with the bearer credential.
    pub async fn confirm_upload(&self, location: Url) -> Result<Response> {
        Ok(self
            .api
            .get(location)
            .headers(self.auth_headers())
            .send()
            .await?)
    }
}

/// Pass the response through when its status is accepted, otherwise turn it into
/// [`Error::UnexpectedStatus`] with the body text.
async fn ensure_status(
    step: &'static str,
    response: Response,
    accepted: &[u16],
) -> Result<Response> {
    let status = response.status().as_u16();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::UnexpectedStatus { step, status, body })
}
