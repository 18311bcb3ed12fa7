//! Maps how a run went to the process exit code.

use tunegrab_core::RunSummary;

use crate::ProcessExit;

/// Per-track tally of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunTally {
    /// Tracks now in the output folder, downloaded or already present.
    pub(crate) satisfied: usize,
    /// Tracks that failed to extract plus links that failed to resolve.
    pub(crate) failed: usize,
    pub(crate) cancelled: bool,
}

impl RunTally {
    /// Tally after the queue ran.
    pub(crate) fn after_download(summary: &RunSummary, failed_links: usize, cancelled: bool) -> Self {
        Self {
            satisfied: summary.completed + summary.skipped,
            failed: summary.failed + failed_links,
            cancelled,
        }
    }

    /// Tally when resolution left nothing to download.
    pub(crate) fn resolution_only(failed_links: usize) -> Self {
        Self {
            failed: failed_links,
            ..Self::default()
        }
    }

    /// Cancellation wins; otherwise any failure downgrades success.
    pub(crate) fn exit(self) -> ProcessExit {
        match self {
            Self {
                cancelled: true, ..
            } => ProcessExit::Cancelled,
            Self { failed: 0, .. } => ProcessExit::Success,
            Self { satisfied: 0, .. } => ProcessExit::Failure,
            _ => ProcessExit::Partial,
        }
    }
}
