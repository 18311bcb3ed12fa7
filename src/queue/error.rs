//! Error types for queue operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during queue operations.
///
/// Per-item extraction failures are not queue errors; they are reported as
/// [`QueueEvent::ItemFailed`](super::QueueEvent::ItemFailed) and processing
/// continues.
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    /// `enqueue` was called outside a tokio runtime, so no processor can run.
    #[error(
        "no async runtime available to process the queue\n  Suggestion: Call enqueue from within a tokio runtime"
    )]
    NoRuntime,

    /// The destination directory does not exist.
    #[error(
        "download directory does not exist: {0}\n  Suggestion: Create the directory or pass a different --output-dir"
    )]
    DestinationMissing(PathBuf),
}
