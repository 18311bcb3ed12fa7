//! Spotify resolver backed by the external metadata endpoint.
//!
//! The endpoint maps a Spotify track or playlist link to YouTube video ids:
//! `GET {base}/api/spotify?spotifyUrl={link}`. It answers either with a bare
//! array of tracks or with `{"tracks": [...]}`; both normalize to the same
//! item list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::http_client::{DEFAULT_METADATA_TIMEOUT_SECS, build_metadata_http_client};
use super::{ItemOptions, LinkKind, Resolution, ResolveError, Resolver, SkippedTrack};

/// Default base URL of the metadata endpoint.
pub const DEFAULT_METADATA_API_BASE: &str = "https://spotify-one-lime.vercel.app";

/// Name used for tracks the endpoint returned without one.
const UNKNOWN_TRACK_NAME: &str = "Unknown";

/// One track as returned by the metadata endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TrackRecord {
    /// YouTube video id.
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
    /// Track title.
    #[serde(default)]
    pub name: Option<String>,
    /// Artist display string.
    #[serde(default)]
    pub artist: Option<String>,
}

/// Extracts the track array from either accepted envelope.
///
/// # Errors
///
/// Returns a description of the shape when the payload is neither a bare
/// array nor an object with a `tracks` array.
pub fn track_entries(payload: Value) -> Result<Vec<Value>, String> {
    match payload {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => match object.remove("tracks") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(format!("`tracks` is {}, expected an array", json_kind(&other))),
            None => Err("object without a `tracks` field".to_string()),
        },
        other => Err(format!("{}, expected an array or an object", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalizes track entries into download items, dropping unusable tracks.
#[must_use]
pub fn normalize_tracks(entries: Vec<Value>, options: &ItemOptions) -> Resolution {
    let mut resolution = Resolution::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let record: TrackRecord = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(error) => {
                resolution.skipped.push(SkippedTrack::new(
                    format!("track #{}", index + 1),
                    format!("malformed track entry: {error}"),
                ));
                continue;
            }
        };

        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_TRACK_NAME)
            .to_string();

        let Some(video_id) = record
            .video_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            resolution
                .skipped
                .push(SkippedTrack::new(name, "no YouTube ID found"));
            continue;
        };

        resolution
            .items
            .push(options.build_item(video_id, &name, record.artist.as_deref()));
    }

    resolution
}

/// Resolver for Spotify links.
#[derive(Debug, Clone)]
pub struct SpotifyResolver {
    client: Client,
    api_base: String,
}

impl SpotifyResolver {
    /// Creates a resolver against `api_base` with the default 45 s timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the HTTP client cannot be built.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ResolveError> {
        Self::with_timeout(api_base, Duration::from_secs(DEFAULT_METADATA_TIMEOUT_SECS))
    }

    /// Creates a resolver with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the HTTP client cannot be built.
    pub fn with_timeout(
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            client: build_metadata_http_client("spotify", timeout)?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the endpoint URL for `link`.
    #[must_use]
    pub fn endpoint_url(&self, link: &str) -> String {
        format!(
            "{}/api/spotify?spotifyUrl={}",
            self.api_base,
            urlencoding::encode(link.trim())
        )
    }

    async fn fetch_payload(&self, link: &str) -> Result<Value, ResolveError> {
        let url = self.endpoint_url(link);
        debug!(url = %url, "Requesting track metadata");

        let response = self.client.get(&url).send().await.map_err(|error| {
            if error.is_timeout() {
                ResolveError::fetch_failed(link, format!("request timed out: {error}"))
            } else {
                ResolveError::fetch_failed(link, error.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::fetch_failed(link, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|error| ResolveError::fetch_failed(link, error.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|error| ResolveError::parse_failed(link, format!("invalid JSON: {error}")))
    }
}

#[async_trait]
impl Resolver for SpotifyResolver {
    fn name(&self) -> &'static str {
        "spotify"
    }

    fn can_handle(&self, kind: LinkKind) -> bool {
        kind == LinkKind::StreamingService
    }

    #[tracing::instrument(skip(self, options), fields(resolver = "spotify"))]
    async fn resolve(&self, link: &str, options: &ItemOptions) -> Result<Resolution, ResolveError> {
        let payload = self.fetch_payload(link).await?;
        let entries = track_entries(payload).map_err(|message| ResolveError::parse_failed(link, message))?;
        let resolution = normalize_tracks(entries, options);

        for skipped in &resolution.skipped {
            warn!(track = %skipped.name, reason = %skipped.reason, "Skipped track");
        }
        info!(
            items = resolution.items.len(),
            skipped = resolution.skipped.len(),
            "Resolved Spotify link"
        );
        Ok(resolution)
    }
}
