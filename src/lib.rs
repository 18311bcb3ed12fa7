//! Tunegrab Core Library
//!
//! This library provides the core functionality for the tunegrab tool,
//! which turns Spotify and YouTube links into local mp3 files by driving
//! an external extraction tool (`yt-dlp`).
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`resolver`] - Link classification and metadata resolution into download items
//! - [`download`] - Filename sanitization, yt-dlp invocation, progress parsing, archives
//! - [`queue`] - In-memory FIFO work queue with a single background processor
//! - [`tools`] - Discovery of the external `yt-dlp` and `ffmpeg` executables

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod queue;
pub mod resolver;
pub mod tools;
mod user_agent;

// Re-export commonly used types
pub use download::{
    AudioExtractor, CancelSignal, DownloadItem, ExtractError, Observation, YtDlpConfig,
    YtDlpExtractor, already_downloaded, build_target_filename, bundle_zip, sanitize_component,
};
pub use queue::{
    EnqueueReport, QueueError, QueueEvent, QueueState, RunSummary, SkipReason, WorkQueue,
};
pub use resolver::{
    DEFAULT_METADATA_API_BASE, ItemOptions, LinkKind, Resolution, ResolveError, ResolverRegistry,
    SkippedTrack, SpotifyResolver, YoutubeResolver, build_default_resolver_registry,
    classify_link,
};
pub use tools::{ToolError, locate_tool};
