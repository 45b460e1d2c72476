//! Per-row status tracking shared by both runners

use serde::Serialize;

/// Lifecycle of one dataset row: `pending → resolving → {skipped | transferring} →
/// {done | failed}`. Rows never move backwards and are never retried.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Pending,
    Resolving,
    Skipped,
    Transferring,
    Done,
    Failed,
}

impl RowStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RowStatus::Skipped | RowStatus::Done | RowStatus::Failed)
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowStatus::Pending => write!(f, "pending"),
            RowStatus::Resolving => write!(f, "resolving"),
            RowStatus::Skipped => write!(f, "skipped"),
            RowStatus::Transferring => write!(f, "transferring"),
            RowStatus::Done => write!(f, "done"),
            RowStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Final state of one row with a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub index: usize,
    pub status: RowStatus,
    pub detail: String,
}

impl RowReport {
    pub fn new(index: usize, status: RowStatus, detail: impl Into<String>) -> Self {
        debug_assert!(status.is_terminal());
        Self {
            index,
            status,
            detail: detail.into(),
        }
    }
}

/// Log a status transition for a row.
pub(crate) fn trace_transition(index: usize, status: RowStatus) {
    log::debug!("[Row {}] -> {}", index, status);
}
