//! Shared User-Agent string for metadata requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/tunegrab";

/// Default User-Agent for metadata endpoint requests.
#[must_use]
pub(crate) fn default_metadata_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tunegrab/{version} (personal-audio-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_user_agent_contains_version_and_url() {
        let ua = default_metadata_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("tunegrab/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }
}
