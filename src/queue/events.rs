//! Events and summaries the queue publishes to its consumer.

use std::fmt;
use std::path::PathBuf;

use crate::download::DownloadItem;

/// Lifecycle of the queue processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueState {
    /// No processor is running.
    #[default]
    Idle,
    /// A processor is draining items.
    Processing,
    /// `cancel_all` was called; the processor is winding down.
    Cancelling,
}

impl QueueState {
    /// Returns the stable label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Cancelling => "cancelling",
        }
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an item was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A file with the target name already exists in the destination.
    AlreadyDownloaded,
    /// An item with the same target name is queued or active.
    AlreadyQueued,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDownloaded => write!(f, "already downloaded"),
            Self::AlreadyQueued => write!(f, "already queued"),
        }
    }
}

/// Outcome of one `enqueue` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnqueueReport {
    /// Number of items appended.
    pub queued: usize,
    /// Items left out, by target filename.
    pub skipped: Vec<(String, SkipReason)>,
}

/// Counters for one processing run.
///
/// A run starts when an idle queue receives items and ends when the queue
/// drains or is cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items extracted successfully.
    pub completed: usize,
    /// Items whose extraction failed.
    pub failed: usize,
    /// Items left out at enqueue time.
    pub skipped: usize,
    /// Items appended during the run (the progress denominator).
    pub total: usize,
    /// Produced files, in completion order.
    pub files: Vec<PathBuf>,
}

impl RunSummary {
    /// Items that have left the queue through the processor.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.completed + self.failed
    }

    /// Overall progress fraction `processed / total`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.processed() as f32 / self.total as f32).min(1.0)
    }
}

/// Status updates posted by the processor and by `cancel_all`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    /// A processing run began with `total` items.
    RunStarted {
        /// Items queued at run start.
        total: usize,
    },
    /// An item was not queued.
    ItemSkipped {
        /// The item's target filename.
        filename: String,
        /// Why.
        reason: SkipReason,
    },
    /// Extraction of an item began.
    ItemStarted {
        /// The item.
        item: DownloadItem,
    },
    /// The extraction tool reported a percentage for the active item.
    ItemProgress {
        /// The item's source id.
        source_id: String,
        /// Percent complete, 0.0..=100.0.
        percent: f32,
    },
    /// An item was extracted.
    ItemCompleted {
        /// The item.
        item: DownloadItem,
        /// Absolute path of the produced file.
        path: PathBuf,
    },
    /// An item failed; processing continues with the next one.
    ItemFailed {
        /// The item.
        item: DownloadItem,
        /// Tool diagnostic, verbatim.
        diagnostic: String,
    },
    /// Overall progress changed.
    Overall {
        /// `processed / total` for the current run.
        fraction: f32,
    },
    /// `cancel_all` discarded the queue.
    Cancelled {
        /// Items removed without being processed.
        dropped: usize,
        /// Whether an active extraction was terminated.
        killed_active: bool,
    },
    /// A processing run ended.
    RunFinished {
        /// Counters for the run.
        summary: RunSummary,
        /// Whether the run ended through `cancel_all`.
        cancelled: bool,
    },
}
