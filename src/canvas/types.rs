//! Canvas file API payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /api/v1/files/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub id: u64,
    pub folder_id: Option<u64>,
    #[serde(default)]
    pub display_name: String,
    pub size: Option<u64>,
    /// Ephemeral download URL; absent when the caller may not download the file.
    pub url: Option<String>,
    #[serde(rename = "content-type")]
    pub content_type: Option<String>,
}

/// `GET /api/v1/folders/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct FolderMetadata {
    #[serde(default)]
    pub id: u64,
    pub context_id: Option<u64>,
    pub context_type: Option<String>,
}

impl FolderMetadata {
    /// Course id when the folder belongs to a course context.
    pub fn course_id(&self) -> Option<u64> {
        match self.context_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("course") => self.context_id,
            _ => None,
        }
    }
}

/// Body of `POST /api/v1/courses/:course_id/files`
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest {
    pub name: String,
    pub parent_folder_id: u64,
    pub on_duplicate: String,
    pub size: u64,
    pub content_type: String,
}

/// Raw initiation response. Both fields must be present to continue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadInitResponse {
    pub upload_url: Option<String>,
    pub upload_params: Option<Map<String, Value>>,
}

/// A usable one-time upload target.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub upload_url: String,
    /// Form fields sent ahead of the file part.
    pub params: Vec<(String, String)>,
}

impl UploadInitResponse {
    /// `None` when the URL or the parameter set is missing or empty.
    pub fn into_ticket(self) -> Option<UploadTicket> {
        let upload_url = self.upload_url.filter(|u| !u.trim().is_empty())?;
        let params = self.upload_params.filter(|p| !p.is_empty())?;
        let params = params
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        Some(UploadTicket { upload_url, params })
    }
}
