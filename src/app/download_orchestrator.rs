//! Drive the work queue for one CLI run: enqueue, render progress, handle Ctrl-C.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tunegrab_core::{
    AudioExtractor, DownloadItem, EnqueueReport, RunSummary, SkipReason, WorkQueue,
    YtDlpExtractor,
};

use crate::app::context::RunContext;
use crate::app::progress_manager;

/// Result of the download phase.
#[derive(Debug)]
pub(crate) struct DownloadOutcome {
    pub(crate) summary: RunSummary,
    /// Every track file now in the output folder, in resolution order:
    /// produced by this run or already present before it.
    pub(crate) available: Vec<PathBuf>,
    pub(crate) cancelled: bool,
}

/// Downloads `items` with yt-dlp into the context's output folder.
pub(crate) async fn run_download(
    ctx: &RunContext,
    items: Vec<DownloadItem>,
    use_bar: bool,
) -> Result<DownloadOutcome> {
    let extractor: Arc<dyn AudioExtractor> = Arc::new(YtDlpExtractor::new(ctx.ytdlp.clone()));
    drive_queue(extractor, &ctx.output_dir, items, use_bar, ctx.args.quiet).await
}

pub(crate) async fn drive_queue(
    extractor: Arc<dyn AudioExtractor>,
    output_dir: &Path,
    items: Vec<DownloadItem>,
    use_bar: bool,
    quiet: bool,
) -> Result<DownloadOutcome> {
    let order: Vec<String> = items
        .iter()
        .map(|item| item.target_filename.clone())
        .collect();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let queue = WorkQueue::with_events(extractor, output_dir, events_tx);

    let report = queue
        .enqueue(items)
        .context("Failed to queue downloads")?;
    if !quiet {
        for (filename, reason) in &report.skipped {
            println!("• {filename} ({reason})");
        }
    }

    if report.queued == 0 {
        info!("Nothing new to download");
        let summary = queue.summary();
        let available = available_files(&order, &summary, &report, output_dir);
        return Ok(DownloadOutcome {
            summary,
            available,
            cancelled: false,
        });
    }

    let progress = progress_manager::spawn_progress_ui(use_bar, quiet, events_rx);

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupt_task = {
        let queue = queue.clone();
        let interrupted = Arc::clone(&interrupted);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.store(true, Ordering::SeqCst);
                warn!("Interrupt received; cancelling downloads");
                queue.cancel_all();
            }
        })
    };

    queue.wait_idle().await;
    interrupt_task.abort();

    let summary = queue.summary();
    drop(queue);
    let _ = progress.await;

    let available = available_files(&order, &summary, &report, output_dir);
    Ok(DownloadOutcome {
        summary,
        available,
        cancelled: interrupted.load(Ordering::SeqCst),
    })
}

/// Maps each target filename to the file that satisfies it, if any.
fn available_files(
    order: &[String],
    summary: &RunSummary,
    report: &EnqueueReport,
    output_dir: &Path,
) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    order
        .iter()
        .filter(|filename| seen.insert(filename.as_str()))
        .filter_map(|filename| {
            let produced = summary
                .files
                .iter()
                .find(|path| path.file_name().is_some_and(|name| name == filename.as_str()));
            if let Some(path) = produced {
                return Some(path.clone());
            }
            report
                .skipped
                .iter()
                .any(|(name, reason)| name == filename && *reason == SkipReason::AlreadyDownloaded)
                .then(|| output_dir.join(filename))
        })
        .collect()
}
