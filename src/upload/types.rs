//! Upload results and run summary

use serde::Serialize;

use crate::status::{trace_transition, RowReport, RowStatus};

/// How the transfer step ended successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferOutcome {
    /// The upload URL accepted the file directly.
    Stored { status: u16 },
    /// The upload URL redirected and the confirmation GET succeeded.
    Confirmed { status: u16, confirm_status: u16 },
}

/// Aggregate result of an upload run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub rows: Vec<RowReport>,
}

impl UploadSummary {
    /// Count a finished row and log its final transition.
    pub(crate) fn record(&mut self, report: RowReport) {
        trace_transition(report.index, report.status);
        match report.status {
            RowStatus::Done => self.succeeded += 1,
            RowStatus::Failed => self.failed += 1,
            _ => self.skipped += 1,
        }
        self.rows.push(report);
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }
}

impl std::fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Upload summary:")?;
        writeln!(f, "  Succeeded: {}", self.succeeded)?;
        writeln!(f, "  Failed:    {}", self.failed)?;
        writeln!(f, "  Skipped:   {}", self.skipped)?;
        writeln!(f, "  Total:     {}", self.total())
    }
}
