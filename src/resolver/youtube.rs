//! YouTube resolver backed by `yt-dlp` in info mode.
//!
//! Runs `yt-dlp --get-title --get-id <link>` and reads title/id line pairs,
//! so a single video yields one item and a playlist yields one per entry.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::download::YtDlpConfig;

use super::{ItemOptions, LinkKind, Resolution, ResolveError, Resolver};

/// Display name used when yt-dlp reports an empty title.
const FALLBACK_TITLE: &str = "YouTube Video";

/// Parses `--get-title --get-id` output into `(title, id)` pairs.
///
/// # Errors
///
/// Returns a message when the output is empty, has an odd number of lines,
/// or contains an empty id.
pub fn parse_info_output(stdout: &str) -> Result<Vec<(String, String)>, String> {
    let mut lines: Vec<&str> = stdout.lines().map(|l| l.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return Err("yt-dlp returned no video information".to_string());
    }
    if lines.len() % 2 != 0 {
        return Err(format!(
            "yt-dlp returned {} lines, expected title/id pairs",
            lines.len()
        ));
    }

    lines
        .chunks_exact(2)
        .map(|pair| {
            let title = pair[0].trim();
            let id = pair[1].trim();
            if id.is_empty() {
                return Err(format!("empty video id for '{title}'"));
            }
            let title = if title.is_empty() { FALLBACK_TITLE } else { title };
            Ok((title.to_string(), id.to_string()))
        })
        .collect()
}

/// Resolver for YouTube video and playlist links.
#[derive(Debug, Clone)]
pub struct YoutubeResolver {
    config: YtDlpConfig,
    timeout: Duration,
}

impl YoutubeResolver {
    /// Creates a resolver that runs `config.program` with a bounded runtime.
    #[must_use]
    pub fn new(config: YtDlpConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    async fn fetch_info(&self, link: &str) -> Result<String, ResolveError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(self.config.common_args())
            .arg("--get-title")
            .arg("--get-id")
            .arg(link.trim())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!(program = %self.config.program.display(), "Running yt-dlp in info mode");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                ResolveError::fetch_failed(
                    link,
                    format!("yt-dlp timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|error| {
                ResolveError::fetch_failed(
                    link,
                    format!(
                        "failed to run {}: {error}",
                        self.config.program.display()
                    ),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("yt-dlp exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ResolveError::fetch_failed(link, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Resolver for YoutubeResolver {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn can_handle(&self, kind: LinkKind) -> bool {
        kind == LinkKind::VideoHost
    }

    #[tracing::instrument(skip(self, options), fields(resolver = "youtube"))]
    async fn resolve(&self, link: &str, options: &ItemOptions) -> Result<Resolution, ResolveError> {
        let stdout = self.fetch_info(link).await?;
        let pairs =
            parse_info_output(&stdout).map_err(|message| ResolveError::fetch_failed(link, message))?;

        let items = pairs
            .iter()
            .map(|(title, id)| options.build_item(id, title, None))
            .collect::<Vec<_>>();
        info!(items = items.len(), "Resolved YouTube link");

        Ok(Resolution {
            items,
            skipped: Vec::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_video() {
        let pairs = parse_info_output("Never Gonna Give You Up\ndQw4w9WgXcQ\n").unwrap();
        assert_eq!(
            pairs,
            vec![("Never Gonna Give You Up".to_string(), "dQw4w9WgXcQ".to_string())]
        );
    }

    #[test]
    fn test_parse_playlist_pairs_in_order() {
        let pairs = parse_info_output("First\nid1\nSecond\nid2\n\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1, "id1");
        assert_eq!(pairs[1].0, "Second");
    }

    #[test]
    fn test_parse_empty_title_uses_fallback() {
        let pairs = parse_info_output("\nabc\n").unwrap();
        assert_eq!(pairs[0].0, FALLBACK_TITLE);
    }

    #[test]
    fn test_parse_rejects_bad_output() {
        assert!(parse_info_output("").is_err());
        assert!(parse_info_output("\n\n").is_err());
        assert!(parse_info_output("Only a title\n").is_err());
        assert!(parse_info_output("Title\n \n").is_err());
    }

    #[test]
    fn test_youtube_resolver_handles_video_host_only() {
        let resolver = YoutubeResolver::new(YtDlpConfig::new("yt-dlp"), Duration::from_secs(5));
        assert!(resolver.can_handle(LinkKind::VideoHost));
        assert!(!resolver.can_handle(LinkKind::StreamingService));
    }
}
