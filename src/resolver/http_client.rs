//! HTTP client construction for the metadata endpoint.
//!
//! Centralizes timeout, user-agent and compression policy so every metadata
//! request is bounded the same way.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::ResolveError;

/// Connect timeout for metadata requests.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default overall timeout for one metadata request.
pub const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 45;

/// Builds the metadata HTTP client with an overall request `timeout`.
///
/// # Errors
///
/// Returns [`ResolveError::MetadataFetchFailed`] when client construction fails.
pub fn build_metadata_http_client(
    resolver_name: &str,
    timeout: Duration,
) -> Result<Client, ResolveError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
        .timeout(timeout)
        .user_agent(user_agent::default_metadata_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| {
            ResolveError::fetch_failed(
                resolver_name,
                format!("HTTP client construction failed: {error}"),
            )
        })
}
