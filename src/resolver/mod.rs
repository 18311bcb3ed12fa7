//! Link resolution: turns a user-supplied link into download items.
//!
//! # Architecture
//!
//! - [`classify_link`] - Decides which service a link belongs to, without network access
//! - [`Resolver`] - Async trait that individual resolvers implement
//! - [`ResolverRegistry`] - Dispatches a classified link to the first resolver that handles it
//! - [`SpotifyResolver`] - Track/playlist metadata via the external metadata endpoint
//! - [`YoutubeResolver`] - Video/playlist metadata via `yt-dlp` in info mode
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tunegrab_core::{ItemOptions, YtDlpConfig, build_default_resolver_registry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_resolver_registry(
//!     tunegrab_core::DEFAULT_METADATA_API_BASE,
//!     Duration::from_secs(45),
//!     YtDlpConfig::new("yt-dlp"),
//! );
//! let resolution = registry
//!     .resolve("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC", &ItemOptions::default())
//!     .await?;
//! for item in &resolution.items {
//!     println!("{} -> {}", item.source_id, item.target_filename);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod link;
mod registry;
mod spotify;
mod youtube;

pub use error::ResolveError;
pub use http_client::DEFAULT_METADATA_TIMEOUT_SECS;
pub use link::{LinkKind, classify_link};
pub use registry::ResolverRegistry;
pub use spotify::{
    DEFAULT_METADATA_API_BASE, SpotifyResolver, TrackRecord, normalize_tracks, track_entries,
};
pub use youtube::{YoutubeResolver, parse_info_output};

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::download::{DEFAULT_PARALLEL_FRAGMENTS, DownloadItem, YtDlpConfig};

/// Builds the registry used by the CLI: Spotify first, then YouTube.
///
/// A resolver that fails to construct is logged and left out; links of its
/// kind then fail with [`ResolveError::NoResolver`].
#[must_use]
pub fn build_default_resolver_registry(
    api_base: &str,
    timeout: Duration,
    ytdlp: YtDlpConfig,
) -> ResolverRegistry {
    let mut registry = ResolverRegistry::new();

    match SpotifyResolver::with_timeout(api_base, timeout) {
        Ok(resolver) => registry.register(Box::new(resolver)),
        Err(error) => warn!(
            error = %error,
            "Spotify resolver unavailable; continuing with remaining resolvers"
        ),
    }

    registry.register(Box::new(YoutubeResolver::new(ytdlp, timeout)));
    registry
}

/// Per-run options copied onto every item a resolver produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOptions {
    /// Optional ceiling on the selected audio stream size.
    pub size_limit_bytes: Option<u64>,
    /// Concurrent fragment count for yt-dlp.
    pub parallel_fragments: u32,
}

impl Default for ItemOptions {
    fn default() -> Self {
        Self {
            size_limit_bytes: None,
            parallel_fragments: DEFAULT_PARALLEL_FRAGMENTS,
        }
    }
}

impl ItemOptions {
    /// Builds a [`DownloadItem`] carrying these options.
    #[must_use]
    pub fn build_item(&self, source_id: &str, name: &str, artist: Option<&str>) -> DownloadItem {
        DownloadItem::new(source_id, name, artist)
            .with_size_limit(self.size_limit_bytes)
            .with_parallel_fragments(self.parallel_fragments)
    }
}

/// A track the metadata source listed but that cannot be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTrack {
    /// Track name, or a positional label when none was given.
    pub name: String,
    /// Why it was dropped.
    pub reason: String,
}

impl SkippedTrack {
    /// Creates a new skipped-track record.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Output of resolving one link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Items in source order.
    pub items: Vec<DownloadItem>,
    /// Tracks dropped during normalization.
    pub skipped: Vec<SkippedTrack>,
}

impl Resolution {
    /// Returns true when nothing downloadable was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trait that all resolvers must implement.
///
/// Uses `async_trait` so resolvers can be stored as `Box<dyn Resolver>`.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the resolver's name (e.g., "spotify", "youtube").
    fn name(&self) -> &str;

    /// Returns true if this resolver handles links of `kind`.
    fn can_handle(&self, kind: LinkKind) -> bool;

    /// Resolves `link` into items, in source order.
    async fn resolve(&self, link: &str, options: &ItemOptions) -> Result<Resolution, ResolveError>;
}
