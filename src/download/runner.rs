//! Bulk download loop

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{DownloadSummary, DownloadedFile, DuplicateSkip};
use super::worker::{check_content_type, save_response};
use crate::canvas::CanvasClient;
use crate::config::DownloadConfig;
use crate::dataset::{duplicate_names, parse_file_id, usable_filename, ColumnFilter, Dataset, Row};
use crate::status::{trace_transition, RowReport, RowStatus};
use crate::{Error, Result};

/// Downloads every qualifying row of a dataset, one row at a time.
pub struct Downloader<'a> {
    client: &'a CanvasClient,
    config: &'a DownloadConfig,
    row_delay: Duration,
}

/// How far a row got before it stopped.
enum RowEnd {
    /// Stopped before any request was sent.
    Offline(RowReport),
    /// At least one request was sent.
    Online(RowReport),
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a CanvasClient, config: &'a DownloadConfig, row_delay: Duration) -> Self {
        Self {
            client,
            config,
            row_delay,
        }
    }

    /// Process the dataset. Only configuration-level problems (missing columns, an
    /// output folder that cannot be created) are returned as errors; every row
    /// problem is logged and counted.
    pub async fn run(&self, dataset: &Dataset) -> Result<DownloadSummary> {
        let mut columns = vec![self.config.id_column.as_str(), self.config.name_column.as_str()];
        columns.extend(self.config.filters.iter().map(|f| f.column.as_str()));
        dataset.require_columns(columns)?;

        tokio::fs::create_dir_all(&self.config.output_folder).await?;

        let mut summary = DownloadSummary::default();
        let mut qualifying = Vec::new();
        for row in dataset.rows() {
            if ColumnFilter::all_match(&self.config.filters, &row) {
                qualifying.push(row);
            } else {
                summary.filtered_out += 1;
                trace_transition(row.index, RowStatus::Pending);
                summary.record(RowReport::new(row.index, RowStatus::Skipped, "filtered out"));
            }
        }
        log::info!(
            "{} of {} rows match the download filters",
            qualifying.len(),
            dataset.len()
        );

        let duplicates = if self.config.skip_duplicate_names {
            let names: Vec<String> = qualifying.iter().filter_map(|r| self.csv_name(r)).collect();
            let duplicates = duplicate_names(names.iter().map(String::as_str));
            if !duplicates.is_empty() {
                log::warn!(
                    "{} filenames occur more than once; those rows will be skipped",
                    duplicates.len()
                );
            }
            duplicates
        } else {
            HashSet::new()
        };

        for row in &qualifying {
            trace_transition(row.index, RowStatus::Pending);

            if let Some(name) = self.csv_name(row).filter(|n| duplicates.contains(n)) {
                log::warn!("[Row {}] Duplicate filename '{}'. Skipping.", row.index, name);
                summary.duplicates.push(DuplicateSkip {
                    index: row.index,
                    name,
                });
                summary.record(RowReport::new(row.index, RowStatus::Skipped, "duplicate filename"));
                continue;
            }

            let end = self.download_row(row, &mut summary).await;
            let (report, online) = match end {
                RowEnd::Offline(report) => (report, false),
                RowEnd::Online(report) => (report, true),
            };
            summary.record(report);

            if online && !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
        }

        log::info!("All downloads complete!");
        Ok(summary)
    }

    /// Sanitized filename from the dataset, if the cell names a file.
    fn csv_name(&self, row: &Row<'_>) -> Option<String> {
        row.value(&self.config.name_column).and_then(usable_filename)
    }

    async fn download_row(&self, row: &Row<'_>, summary: &mut DownloadSummary) -> RowEnd {
        let index = row.index;
        let Some(file_id) = row.value(&self.config.id_column).and_then(parse_file_id) else {
            log::warn!("Row {} has no File ID. Skipping.", index);
            return RowEnd::Offline(RowReport::new(index, RowStatus::Skipped, "missing file id"));
        };

        trace_transition(index, RowStatus::Resolving);
        let meta = match self.client.get_file(file_id).await {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!(
                    "Failed to retrieve metadata for file ID {} (Status: {}). Skipping.",
                    file_id,
                    status_label(&e)
                );
                return RowEnd::Online(RowReport::new(index, RowStatus::Skipped, e.to_string()));
            }
        };

        let Some(download_url) = meta.url.as_deref().filter(|u| !u.is_empty()) else {
            let e = Error::MissingDownloadUrl(file_id);
            log::warn!("{}. Skipping.", e);
            return RowEnd::Online(RowReport::new(index, RowStatus::Skipped, e.to_string()));
        };

        let file_name = self
            .csv_name(row)
            .or_else(|| usable_filename(&meta.display_name))
            .unwrap_or_else(|| format!("file_{}", file_id));

        log::info!("Downloading {} from {}", file_name, download_url);
        let response = match self.client.open_download(download_url).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!(
                    "Failed to download {} (Status: {}).",
                    file_name,
                    status_label(&e)
                );
                return RowEnd::Online(RowReport::new(index, RowStatus::Skipped, e.to_string()));
            }
        };
        check_content_type(&response, &self.config.expected_content_type, &file_name);

        trace_transition(index, RowStatus::Transferring);
        let destination = self.config.output_folder.join(&file_name);
        let file = match self.save(response, &destination, meta.size).await {
            Ok(file) => file,
            Err(e) => {
                log::error!("Failed to save {}: {}", file_name, e);
                return RowEnd::Online(RowReport::new(index, RowStatus::Failed, e.to_string()));
            }
        };

        if file.is_short() {
            summary.short += 1;
            log::warn!(
                "Downloaded {} is smaller than expected (Expected: {} bytes, Got: {} bytes).",
                file_name,
                file.expected_size.unwrap_or(0),
                file.bytes_written
            );
        } else {
            log::info!(
                "Downloaded: {} ({} bytes) successfully.",
                file_name,
                file.bytes_written
            );
        }

        RowEnd::Online(RowReport::new(
            index,
            RowStatus::Done,
            file.path.display().to_string(),
        ))
    }

    async fn save(
        &self,
        response: reqwest::Response,
        destination: &Path,
        expected_size: Option<u64>,
    ) -> Result<DownloadedFile> {
        let bytes_written = save_response(response, destination).await?;
        Ok(DownloadedFile {
            path: PathBuf::from(destination),
            bytes_written,
            expected_size,
        })
    }
}

/// Status code for log lines, or the transport error when no response arrived.
fn status_label(error: &Error) -> String {
    match error.status() {
        Some(status) => status.to_string(),
        None => error.to_string(),
    }
}
