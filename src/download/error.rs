//! Error types for the download module.
//!
//! Every variant is terminal for its own item only: the queue reports it and
//! moves on to the next item. Nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting one item.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extraction tool could not be started.
    #[error("failed to start {program}: {source}\n  Suggestion: Check that yt-dlp is installed and executable")]
    Spawn {
        /// The program that failed to start.
        program: PathBuf,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The extraction tool exited unsuccessfully.
    ///
    /// `diagnostic` is the tool's stderr, surfaced verbatim.
    #[error("yt-dlp failed for {source_id} (exit code {code:?}): {diagnostic}")]
    ToolFailed {
        /// The item's video id.
        source_id: String,
        /// Exit code, when the process was not killed by a signal.
        code: Option<i32>,
        /// Captured diagnostic text.
        diagnostic: String,
    },

    /// The tool reported success but the expected output file is missing.
    ///
    /// `diagnostic` is the tool's stderr, surfaced verbatim.
    #[error("yt-dlp finished but no output file was found for {source_id} (expected {expected}): {diagnostic}")]
    MissingOutput {
        /// The item's video id.
        source_id: String,
        /// The path that was expected to exist.
        expected: PathBuf,
        /// Captured diagnostic text.
        diagnostic: String,
    },

    /// Filesystem error while reading output or moving the produced file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled while this item was in flight.
    #[error("extraction of {source_id} was cancelled")]
    Cancelled {
        /// The item's video id.
        source_id: String,
    },
}

impl ExtractError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error represents a user cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Text shown to the user for a failed item.
    ///
    /// For tool failures and missing output this is the captured diagnostic
    /// alone, unchanged.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::ToolFailed { diagnostic, .. } | Self::MissingOutput { diagnostic, .. } => {
                diagnostic.clone()
            }
            other => other.to_string(),
        }
    }
}
