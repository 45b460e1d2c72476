//! Download results and run summary

use serde::Serialize;
use std::path::PathBuf;

use crate::status::{trace_transition, RowReport, RowStatus};

/// Write buffer size for downloads (256 KB) - reduces I/O operations
pub const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// A file saved to disk.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedFile {
    pub path: PathBuf,
    /// Bytes read from the response stream and written to `path`.
    pub bytes_written: u64,
    /// Size reported by the file metadata.
    pub expected_size: Option<u64>,
}

impl DownloadedFile {
    /// The saved file is smaller than the size Canvas reported.
    pub fn is_short(&self) -> bool {
        matches!(
            self.expected_size,
            Some(expected) if expected > 0 && self.bytes_written < expected
        )
    }
}

/// A row skipped because its sanitized filename occurs on several rows.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DuplicateSkip {
    pub index: usize,
    pub name: String,
}

/// Aggregate result of a download run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadSummary {
    pub downloaded: usize,
    /// Rows skipped for any reason, filtered-out and duplicate rows included.
    pub skipped: usize,
    pub failed: usize,
    /// Downloads kept despite being smaller than expected.
    pub short: usize,
    pub filtered_out: usize,
    pub duplicates: Vec<DuplicateSkip>,
    pub rows: Vec<RowReport>,
}

impl DownloadSummary {
    /// Count a finished row and log its final transition.
    pub(crate) fn record(&mut self, report: RowReport) {
        trace_transition(report.index, report.status);
        match report.status {
            RowStatus::Done => self.downloaded += 1,
            RowStatus::Failed => self.failed += 1,
            _ => self.skipped += 1,
        }
        self.rows.push(report);
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }
}

impl std::fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Downloaded: {} files.", self.downloaded)?;
        writeln!(
            f,
            "Skipped: {} (filtered out: {}, duplicate names: {}). Failed: {}. \
             Smaller than expected: {}.",
            self.skipped,
            self.filtered_out,
            self.duplicates.len(),
            self.failed,
            self.short
        )?;
        if !self.duplicates.is_empty() {
            writeln!(f, "Skipped duplicate filenames:")?;
            for dup in &self.duplicates {
                writeln!(f, "  row {}: {}", dup.index, dup.name)?;
            }
        }
        Ok(())
    }
}
