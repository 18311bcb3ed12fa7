//! Resolve every input link into download items, in input order.

use tracing::{info, warn};
use tunegrab_core::{DownloadItem, ResolverRegistry, SkippedTrack, build_default_resolver_registry};

use crate::app::context::RunContext;

/// Outcome of the resolution phase.
#[derive(Debug, Default)]
pub(crate) struct ResolutionOutcome {
    /// Items from all links that resolved, in input order.
    pub(crate) items: Vec<DownloadItem>,
    /// Tracks dropped by the metadata source normalization.
    pub(crate) skipped_tracks: Vec<SkippedTrack>,
    /// Links that failed, with their error text.
    pub(crate) failed_links: Vec<(String, String)>,
    /// Number of links attempted.
    pub(crate) link_count: usize,
}

impl ResolutionOutcome {
    pub(crate) fn all_links_failed(&self) -> bool {
        self.link_count > 0 && self.failed_links.len() == self.link_count
    }
}

/// Builds the default registry from the run context and resolves `ctx.args.urls`.
pub(crate) async fn run_resolution(ctx: &RunContext) -> ResolutionOutcome {
    let registry =
        build_default_resolver_registry(&ctx.api_base, ctx.metadata_timeout, ctx.ytdlp.clone());
    resolve_links(&registry, ctx).await
}

pub(crate) async fn resolve_links(registry: &ResolverRegistry, ctx: &RunContext) -> ResolutionOutcome {
    let mut outcome = ResolutionOutcome {
        link_count: ctx.args.urls.len(),
        ..ResolutionOutcome::default()
    };

    for link in &ctx.args.urls {
        match registry.resolve(link, &ctx.item_options).await {
            Ok(resolution) => {
                info!(
                    link = %link,
                    items = resolution.items.len(),
                    skipped = resolution.skipped.len(),
                    "Resolved link"
                );
                outcome.items.extend(resolution.items);
                outcome.skipped_tracks.extend(resolution.skipped);
            }
            Err(error) => {
                warn!(link = %link, error = %error, "Link resolution failed");
                outcome.failed_links.push((link.clone(), error.to_string()));
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_links_failed() {
        let mut outcome = ResolutionOutcome {
            link_count: 2,
            ..ResolutionOutcome::default()
        };
        assert!(!outcome.all_links_failed());
        outcome.failed_links.push(("a".into(), "e".into()));
        assert!(!outcome.all_links_failed());
        outcome.failed_links.push(("b".into(), "e".into()));
        assert!(outcome.all_links_failed());
        assert!(!ResolutionOutcome::default().all_links_failed());
    }
}
