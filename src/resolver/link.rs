//! Link classification.
//!
//! Decides which resolver, if any, handles a user-supplied link. No network
//! access happens here.

use std::fmt;

use url::Url;

/// The kind of service a link points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A Spotify track, album or playlist.
    StreamingService,
    /// A YouTube video or playlist.
    VideoHost,
    /// Anything else.
    Unsupported,
}

impl LinkKind {
    /// Returns the stable label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StreamingService => "streaming_service",
            Self::VideoHost => "video_host",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Classifies a link by host.
///
/// Inputs that do not parse as URLs fall back to a case-insensitive
/// substring check, so `open.spotify.com/track/...` without a scheme still
/// resolves.
#[must_use]
pub fn classify_link(input: &str) -> LinkKind {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return LinkKind::Unsupported;
    }

    if let Ok(url) = Url::parse(trimmed) {
        if !matches!(url.scheme(), "http" | "https") {
            return LinkKind::Unsupported;
        }
        let Some(host) = url.host_str() else {
            return LinkKind::Unsupported;
        };
        let host = host.to_ascii_lowercase();
        if host_matches(&host, "spotify.com") {
            return LinkKind::StreamingService;
        }
        if host_matches(&host, "youtube.com") || host_matches(&host, "youtu.be") {
            return LinkKind::VideoHost;
        }
        return LinkKind::Unsupported;
    }

    let lowered = trimmed.to_ascii_lowercase();
    if lowered.contains("spotify.com") {
        LinkKind::StreamingService
    } else if lowered.contains("youtube.com") || lowered.contains("youtu.be") {
        LinkKind::VideoHost
    } else {
        LinkKind::Unsupported
    }
}
