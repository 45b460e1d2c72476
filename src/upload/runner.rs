//! Bulk replacement loop

use std::path::Path;
use std::time::Duration;

use super::handshake::transfer;
use super::types::{TransferOutcome, UploadSummary};
use crate::canvas::{CanvasClient, UploadRequest};
use crate::config::UploadConfig;
use crate::dataset::{parse_file_id, usable_filename, Dataset, Row};
use crate::status::{trace_transition, RowReport, RowStatus};
use crate::Error;

/// Replaces Canvas files in place with local copies, one row at a time.
pub struct Uploader<'a> {
    client: &'a CanvasClient,
    config: &'a UploadConfig,
    row_delay: Duration,
}

impl<'a> Uploader<'a> {
    pub fn new(client: &'a CanvasClient, config: &'a UploadConfig, row_delay: Duration) -> Self {
        Self {
            client,
            config,
            row_delay,
        }
    }

    /// Process the dataset. Only a missing column is returned as an error.
    pub async fn run(&self, dataset: &Dataset) -> crate::Result<UploadSummary> {
        dataset.require_columns([
            self.config.id_column.as_str(),
            self.config.file_column.as_str(),
        ])?;

        let mut summary = UploadSummary::default();
        for row in dataset.rows() {
            trace_transition(row.index, RowStatus::Pending);
            let (report, online) = self.replace_row(&row).await;
            summary.record(report);

            if online && !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
        }
        Ok(summary)
    }

    /// Returns the row's report and whether any request was sent for it.
    async fn replace_row(&self, row: &Row<'_>) -> (RowReport, bool) {
        let index = row.index;
        let skip = |detail: String, online: bool| {
            (RowReport::new(index, RowStatus::Skipped, detail), online)
        };

        let Some(file_id) = row.value(&self.config.id_column).and_then(parse_file_id) else {
            log::warn!("[Row {}] Missing file_id. Skipping.", index);
            return skip("missing file id".to_string(), false);
        };

        let local_path = row
            .value(&self.config.file_column)
            .and_then(usable_filename)
            .map(|name| self.config.source_folder.join(name));
        let local_path = match local_path {
            Some(path) if path.is_file() => path,
            other => {
                let shown = other
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "None".to_string());
                log::warn!(
                    "[Row {}] Local file path missing or invalid: {}. Skipping.",
                    index,
                    shown
                );
                return skip(Error::LocalFileMissing(shown).to_string(), false);
            }
        };

        trace_transition(index, RowStatus::Resolving);
        let file_info = match self.client.get_file(file_id).await {
            Ok(info) => info,
            Err(e) => {
                log::warn!(
                    "[Row {}] Failed to get metadata for file_id={}: {}. Skipping.",
                    index,
                    file_id,
                    e
                );
                return skip(e.to_string(), true);
            }
        };

        let Some(folder_id) = file_info.folder_id else {
            log::warn!("[Row {}] File {} has no folder_id. Skipping.", index, file_id);
            return skip("file has no folder".to_string(), true);
        };
        let folder = match self.client.get_folder(folder_id).await {
            Ok(folder) => folder,
            Err(e) => {
                log::warn!(
                    "[Row {}] Failed to get folder info for folder_id={}: {}. Skipping.",
                    index,
                    folder_id,
                    e
                );
                return skip(e.to_string(), true);
            }
        };
        let Some(course_id) = folder.course_id() else {
            let e = Error::NotCourseFolder(folder.context_type.unwrap_or_default());
            log::warn!("[Row {}] {}. Skipping.", index, e);
            return skip(e.to_string(), true);
        };

        log::info!(
            "[Row {}] Overwriting file_id={} with local file: {}",
            index,
            file_id,
            local_path.display()
        );
        trace_transition(index, RowStatus::Transferring);
        let report = match self
            .overwrite(course_id, folder_id, &local_path, &file_info.display_name)
            .await
        {
            Ok(outcome) => {
                log::info!("[Row {}] Successfully replaced file_id={}.", index, file_id);
                RowReport::new(index, RowStatus::Done, format!("{:?}", outcome))
            }
            Err(e) => {
                log::error!("[Row {}] Failed to replace file_id={}: {}", index, file_id, e);
                RowReport::new(index, RowStatus::Failed, e.to_string())
            }
        };
        (report, true)
    }

    /// Initiate the upload under the remote file's current name, then transfer.
    async fn overwrite(
        &self,
        course_id: u64,
        folder_id: u64,
        local_path: &Path,
        remote_name: &str,
    ) -> crate::Result<TransferOutcome> {
        let size = tokio::fs::metadata(local_path).await?.len();
        let name = if remote_name.is_empty() {
            local_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            remote_name.to_string()
        };

        let request = UploadRequest {
            name: name.clone(),
            parent_folder_id: folder_id,
            on_duplicate: self.config.on_duplicate.clone(),
            size,
            content_type: self.config.content_type.clone(),
        };
        log::info!(
            "[Initiate] POST courses/{}/files for '{}' ({} bytes)",
            course_id,
            name,
            size
        );
        let ticket = self.client.initiate_upload(course_id, &request).await?;

        transfer(
            self.client,
            &ticket,
            local_path,
            &name,
            &self.config.content_type,
            size,
        )
        .await
    }
}
