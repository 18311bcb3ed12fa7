//! The unit of work moving through resolution, the queue and extraction.

use serde::Serialize;

use super::filename::build_target_filename;

/// Default number of fragments yt-dlp downloads concurrently.
pub const DEFAULT_PARALLEL_FRAGMENTS: u32 = 1;

/// One audio track to download.
///
/// Created by a resolver, never mutated after enqueueing, and consumed
/// (removed) by the queue processor whether it succeeds, fails or is
/// cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadItem {
    /// Platform video identifier (YouTube id).
    pub source_id: String,
    /// Track title as reported by the metadata source.
    pub display_name: String,
    /// Artist, when the metadata source provided one.
    pub artist: Option<String>,
    /// Sanitized final filename; the dedup key.
    pub target_filename: String,
    /// Optional ceiling on the selected audio stream size.
    pub size_limit_bytes: Option<u64>,
    /// Concurrent fragment count passed to yt-dlp.
    pub parallel_fragments: u32,
}

impl DownloadItem {
    /// Creates an item with default options, computing its target filename.
    #[must_use]
    pub fn new(source_id: impl Into<String>, display_name: impl Into<String>, artist: Option<&str>) -> Self {
        let display_name = display_name.into();
        let target_filename = build_target_filename(&display_name, artist);
        Self {
            source_id: source_id.into(),
            display_name,
            artist: artist.map(ToString::to_string),
            target_filename,
            size_limit_bytes: None,
            parallel_fragments: DEFAULT_PARALLEL_FRAGMENTS,
        }
    }

    /// Sets the size ceiling.
    #[must_use]
    pub fn with_size_limit(mut self, bytes: Option<u64>) -> Self {
        self.size_limit_bytes = bytes;
        self
    }

    /// Sets the concurrent fragment count (at least 1).
    #[must_use]
    pub fn with_parallel_fragments(mut self, fragments: u32) -> Self {
        self.parallel_fragments = fragments.max(1);
        self
    }
}
