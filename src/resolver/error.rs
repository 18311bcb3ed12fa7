//! Error types for resolver operations.
//!
//! Each variant is fatal for the request that produced it; nothing is retried.
//! Messages follow the What / Suggestion layout used across the project.

use thiserror::Error;

/// Errors that can occur while turning a link into download items.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The link matches no known service pattern.
    #[error(
        "unsupported link '{input}'\n  Suggestion: Paste a Spotify track/playlist link or a YouTube video link"
    )]
    LinkUnsupported {
        /// The rejected input.
        input: String,
    },

    /// The link kind is known but no resolver for it is available.
    #[error(
        "no resolver available for {kind} link '{input}'\n  Suggestion: Check the warnings printed at startup; the resolver may have failed to initialize"
    )]
    NoResolver {
        /// The link being resolved.
        input: String,
        /// Classified link kind.
        kind: String,
    },

    /// The metadata source could not be reached or refused the request.
    #[error("could not fetch track information for '{input}': {message}")]
    MetadataFetchFailed {
        /// The link being resolved.
        input: String,
        /// The underlying message, surfaced verbatim.
        message: String,
    },

    /// The metadata source answered with an unexpected shape.
    #[error(
        "unexpected track information for '{input}': {message}\n  Suggestion: The metadata service may have changed; try again later"
    )]
    MetadataParseFailed {
        /// The link being resolved.
        input: String,
        /// What was wrong with the payload.
        message: String,
    },
}

impl ResolveError {
    /// Creates a `LinkUnsupported` error.
    #[must_use]
    pub fn unsupported(input: &str) -> Self {
        Self::LinkUnsupported {
            input: input.to_string(),
        }
    }

    /// Creates a `NoResolver` error.
    #[must_use]
    pub fn no_resolver(input: &str, kind: impl Into<String>) -> Self {
        Self::NoResolver {
            input: input.to_string(),
            kind: kind.into(),
        }
    }

    /// Creates a `MetadataFetchFailed` error.
    #[must_use]
    pub fn fetch_failed(input: &str, message: impl Into<String>) -> Self {
        Self::MetadataFetchFailed {
            input: input.to_string(),
            message: message.into(),
        }
    }

    /// Creates a `MetadataParseFailed` error.
    #[must_use]
    pub fn parse_failed(input: &str, message: impl Into<String>) -> Self {
        Self::MetadataParseFailed {
            input: input.to_string(),
            message: message.into(),
        }
    }
}
