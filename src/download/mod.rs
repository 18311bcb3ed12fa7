//! Audio extraction through the external `yt-dlp` tool.
//!
//! This module owns everything that happens to a single [`DownloadItem`]:
//! computing its final filename, building the `yt-dlp` argument list,
//! running the process while parsing its output for progress, and moving
//! the produced file to its sanitized name.
//!
//! # Features
//!
//! - Deterministic filename sanitization with on-disk deduplication
//! - Streaming progress parsing of combined stdout/stderr (best effort)
//! - Fire-and-wait mode that inspects only the exit code
//! - Cooperative cancellation that terminates the child process
//! - Zip bundling of multi-track results
//!
//! # Example
//!
//! ```no_run
//! use tunegrab_core::download::{
//!     AudioExtractor, CancelSignal, DownloadItem, YtDlpConfig, YtDlpExtractor,
//! };
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = YtDlpExtractor::new(YtDlpConfig::new("yt-dlp"));
//! let item = DownloadItem::new("dQw4w9WgXcQ", "Never Gonna Give You Up", Some("Rick Astley"));
//! let path = extractor
//!     .extract(&item, Path::new("./music"), &|_| {}, CancelSignal::never())
//!     .await?;
//! println!("Saved: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod archive;
mod error;
mod extractor;
mod filename;
mod item;
pub mod progress;
mod ytdlp;

pub use archive::{ArchiveError, DEFAULT_ARCHIVE_NAME, bundle_zip};
pub use error::ExtractError;
pub use extractor::{AudioExtractor, CancelSignal, KillHandle, kill_switch};
pub use filename::{
    UNKNOWN_ARTIST_SENTINELS, already_downloaded, build_target_filename, sanitize_component,
};
pub use item::{DEFAULT_PARALLEL_FRAGMENTS, DownloadItem};
pub use ytdlp::{
    Observation, YtDlpConfig, YtDlpExtractor, build_download_args, size_limit_format,
    watch_url,
};
