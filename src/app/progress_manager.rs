//! Progress UI for download runs, driven by queue events.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tunegrab_core::QueueEvent;

/// Where per-item result lines go: above the bar, or plain stdout/stderr.
struct Reporter {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl Reporter {
    fn info(&self, line: &str) {
        if self.quiet {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn error(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

/// Spawns the task that renders queue events until the run finishes.
///
/// With `use_bar` false, only result lines are printed.
pub(crate) fn spawn_progress_ui(
    use_bar: bool,
    quiet: bool,
    events: UnboundedReceiver<QueueEvent>,
) -> tokio::task::JoinHandle<()> {
    let bar = use_bar.then(|| {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    });
    tokio::spawn(render_events(Reporter { bar, quiet }, events))
}

async fn render_events(reporter: Reporter, mut events: UnboundedReceiver<QueueEvent>) {
    let mut current = String::new();

    while let Some(event) = events.recv().await {
        match event {
            QueueEvent::RunStarted { total } => {
                if let Some(bar) = &reporter.bar {
                    bar.set_length(total as u64);
                    bar.set_position(0);
                }
            }
            QueueEvent::ItemStarted { item } => {
                current = item.target_filename;
                if let Some(bar) = &reporter.bar {
                    bar.set_message(format!("Downloading {current}"));
                }
            }
            QueueEvent::ItemProgress { percent, .. } => {
                if let Some(bar) = &reporter.bar {
                    bar.set_message(format!("Downloading {current} {percent:.0}%"));
                }
            }
            QueueEvent::ItemCompleted { item, path } => {
                if let Some(bar) = &reporter.bar {
                    bar.inc(1);
                }
                reporter.info(&format!("✓ {} -> {}", item.target_filename, path.display()));
            }
            QueueEvent::ItemFailed { item, diagnostic } => {
                if let Some(bar) = &reporter.bar {
                    bar.inc(1);
                }
                reporter.error(&format!("✗ {}", item.target_filename));
                for line in diagnostic.lines() {
                    reporter.error(&format!("    {line}"));
                }
            }
            QueueEvent::Cancelled { dropped, .. } => {
                reporter.error(&format!(
                    "Cancelled. {dropped} queued track(s) discarded."
                ));
            }
            QueueEvent::RunFinished { .. } => break,
            QueueEvent::ItemSkipped { .. } | QueueEvent::Overall { .. } => {}
        }
    }

    if let Some(bar) = &reporter.bar {
        bar.finish_and_clear();
    }
}
