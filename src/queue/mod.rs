//! In-memory FIFO work queue with a single background processor.
//!
//! The queue owns the pending [`DownloadItem`]s and drives an
//! [`AudioExtractor`] over them one at a time, in enqueue order. Consumers
//! observe progress through [`QueueEvent`]s posted on an unbounded channel
//! and control the queue only through [`WorkQueue::enqueue`] and
//! [`WorkQueue::cancel_all`].
//!
//! # Overview
//!
//! - [`WorkQueue`] - Cloneable handle shared by the CLI loop and the processor
//! - [`QueueState`] - `Idle -> Processing -> Idle`, or `Processing -> Cancelling -> Idle`
//! - [`QueueEvent`] - Status messages for the presentation layer
//! - [`RunSummary`] - Counters for one processing run
//!
//! # Concurrency
//!
//! One mutex guards the pending items, the processing flag, the shutdown
//! signal and the active item's kill handle. It is held only for bounded
//! critical sections (append, pop, clear) and never across an extraction.
//! At most one processor task exists at any time.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tunegrab_core::{DownloadItem, WorkQueue, YtDlpConfig, YtDlpExtractor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Arc::new(YtDlpExtractor::new(YtDlpConfig::new("yt-dlp")));
//! let queue = WorkQueue::new(extractor, "./music");
//! queue.enqueue(vec![DownloadItem::new("dQw4w9WgXcQ", "Song", Some("Artist"))])?;
//! queue.wait_idle().await;
//! println!("progress: {:.0}%", queue.progress() * 100.0);
//! # Ok(())
//! # }
//! ```

mod error;
mod events;

pub use error::QueueError;
pub use events::{EnqueueReport, QueueEvent, QueueState, RunSummary, SkipReason};

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::download::{
    AudioExtractor, CancelSignal, DownloadItem, ExtractError, KillHandle, already_downloaded,
    kill_switch,
};

/// The item currently handed to the extractor.
struct ActiveItem {
    filename: String,
    kill: KillHandle,
}

#[derive(Default)]
struct QueueInner {
    pending: VecDeque<DownloadItem>,
    processing: bool,
    /// Signal for the current run; replaced with a fresh one on cancel.
    shutdown: Arc<AtomicBool>,
    active: Option<ActiveItem>,
    run: RunSummary,
    /// Set between `cancel_all` and the processor observing it.
    run_cancelled: bool,
    /// Counters for items enqueued while a cancelled run winds down.
    next_run: Option<RunSummary>,
}

impl QueueInner {
    fn is_queued(&self, filename: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.filename == filename)
            || self.pending.iter().any(|i| i.target_filename == filename)
    }
}

struct Shared {
    extractor: Arc<dyn AudioExtractor>,
    destination: PathBuf,
    inner: Mutex<QueueInner>,
    state: watch::Sender<QueueState>,
    events: Option<mpsc::UnboundedSender<QueueEvent>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: QueueEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is listening.
            let _ = events.send(event);
        }
    }

    fn set_state(&self, state: QueueState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "Queue state changed");
        }
    }

    /// Pops the next item, or ends the processor's run.
    ///
    /// `shutdown` is the processor's copy of the run signal; it is swapped
    /// for the fresh one when a cancelled run is followed by new items.
    fn next_item(&self, shutdown: &mut Arc<AtomicBool>) -> Option<(DownloadItem, CancelSignal)> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if shutdown.load(Ordering::SeqCst) {
            info!(
                completed = inner.run.completed,
                failed = inner.run.failed,
                "Run cancelled"
            );
            self.emit(QueueEvent::RunFinished {
                summary: inner.run.clone(),
                cancelled: true,
            });
            inner.run_cancelled = false;

            if inner.pending.is_empty() {
                inner.processing = false;
                inner.next_run = None;
                self.set_state(QueueState::Idle);
                return None;
            }

            inner.run = inner.next_run.take().unwrap_or_default();
            *shutdown = Arc::clone(&inner.shutdown);
            self.set_state(QueueState::Processing);
            info!(total = inner.run.total, "Starting new run after cancellation");
            self.emit(QueueEvent::RunStarted {
                total: inner.run.total,
            });
        }

        let Some(item) = inner.pending.pop_front() else {
            inner.processing = false;
            self.set_state(QueueState::Idle);
            info!(
                completed = inner.run.completed,
                failed = inner.run.failed,
                skipped = inner.run.skipped,
                "Queue drained"
            );
            self.emit(QueueEvent::RunFinished {
                summary: inner.run.clone(),
                cancelled: false,
            });
            return None;
        };

        let (kill, signal) = kill_switch();
        inner.active = Some(ActiveItem {
            filename: item.target_filename.clone(),
            kill,
        });
        Some((item, signal))
    }

    fn finish_item(&self, item: DownloadItem, result: Result<PathBuf, ExtractError>) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.active = None;

        match result {
            Ok(path) => {
                info!(file = %item.target_filename, path = %path.display(), "Item completed");
                inner.run.completed += 1;
                inner.run.files.push(path.clone());
                self.emit(QueueEvent::ItemCompleted { item, path });
            }
            Err(error) if error.is_cancelled() => {
                info!(file = %item.target_filename, "Item cancelled");
                return;
            }
            Err(error) => {
                warn!(file = %item.target_filename, error = %error, "Item failed");
                inner.run.failed += 1;
                self.emit(QueueEvent::ItemFailed {
                    item,
                    diagnostic: error.diagnostic(),
                });
            }
        }

        self.emit(QueueEvent::Overall {
            fraction: inner.run.fraction(),
        });
    }
}

/// Cloneable handle to an in-memory download queue.
#[derive(Clone)]
pub struct WorkQueue {
    shared: Arc<Shared>,
}

impl fmt::Debug for WorkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkQueue")
            .field("extractor", &self.shared.extractor.name())
            .field("destination", &self.shared.destination)
            .field("state", &self.state())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl WorkQueue {
    /// Creates an idle queue that extracts into `destination`.
    #[must_use]
    pub fn new(extractor: Arc<dyn AudioExtractor>, destination: impl Into<PathBuf>) -> Self {
        Self::build(extractor, destination.into(), None)
    }

    /// Creates an idle queue that posts [`QueueEvent`]s to `events`.
    #[must_use]
    pub fn with_events(
        extractor: Arc<dyn AudioExtractor>,
        destination: impl Into<PathBuf>,
        events: mpsc::UnboundedSender<QueueEvent>,
    ) -> Self {
        Self::build(extractor, destination.into(), Some(events))
    }

    fn build(
        extractor: Arc<dyn AudioExtractor>,
        destination: PathBuf,
        events: Option<mpsc::UnboundedSender<QueueEvent>>,
    ) -> Self {
        let (state, _) = watch::channel(QueueState::Idle);
        Self {
            shared: Arc::new(Shared {
                extractor,
                destination,
                inner: Mutex::new(QueueInner::default()),
                state,
                events,
            }),
        }
    }

    /// Returns the download directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.shared.destination
    }

    /// Appends `items` in order and starts the processor if it is idle.
    ///
    /// Items whose target file already exists in the destination, or whose
    /// target name is already queued or active, are skipped and never reach
    /// the extractor. Starting an already running processor is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NoRuntime`] when called outside a tokio runtime
    /// and [`QueueError::DestinationMissing`] when the destination directory
    /// does not exist. Nothing is queued in either case.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub fn enqueue(&self, items: Vec<DownloadItem>) -> Result<EnqueueReport, QueueError> {
        let runtime = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;
        let destination = &self.shared.destination;
        if !destination.is_dir() {
            return Err(QueueError::DestinationMissing(destination.clone()));
        }

        let mut guard = self.shared.lock();
        let inner = &mut *guard;

        let starting = !inner.processing;
        if starting {
            inner.run = RunSummary::default();
            inner.next_run = None;
        }

        let mut report = EnqueueReport::default();
        for item in items {
            let reason = if already_downloaded(destination, &item.target_filename) {
                Some(SkipReason::AlreadyDownloaded)
            } else if inner.is_queued(&item.target_filename) {
                Some(SkipReason::AlreadyQueued)
            } else {
                None
            };

            let counters = if inner.run_cancelled {
                inner.next_run.get_or_insert_with(RunSummary::default)
            } else {
                &mut inner.run
            };

            match reason {
                Some(reason) => {
                    debug!(file = %item.target_filename, reason = %reason, "Skipping item");
                    counters.skipped += 1;
                    self.shared.emit(QueueEvent::ItemSkipped {
                        filename: item.target_filename.clone(),
                        reason,
                    });
                    report.skipped.push((item.target_filename, reason));
                }
                None => {
                    counters.total += 1;
                    inner.pending.push_back(item);
                    report.queued += 1;
                }
            }
        }

        if starting && !inner.pending.is_empty() {
            inner.processing = true;
            let shutdown = Arc::clone(&inner.shutdown);
            self.shared.set_state(QueueState::Processing);
            info!(total = inner.run.total, "Starting queue processor");
            self.shared.emit(QueueEvent::RunStarted {
                total: inner.run.total,
            });
            runtime.spawn(run_processor(Arc::clone(&self.shared), shutdown));
        }

        debug!(
            queued = report.queued,
            skipped = report.skipped.len(),
            pending = inner.pending.len(),
            "Enqueue complete"
        );
        Ok(report)
    }

    /// Stops everything: signals shutdown, terminates the active extraction,
    /// clears pending items and installs a fresh shutdown signal.
    ///
    /// Partial output of the terminated extraction is left on disk. Returns
    /// the number of pending items discarded.
    #[instrument(skip(self))]
    pub fn cancel_all(&self) -> usize {
        let (dropped, kill) = {
            let mut guard = self.shared.lock();
            let inner = &mut *guard;

            inner.shutdown.store(true, Ordering::SeqCst);
            let dropped = inner.pending.len();
            inner.pending.clear();
            inner.shutdown = Arc::new(AtomicBool::new(false));
            let kill = inner.active.take().map(|active| active.kill);

            if inner.processing {
                inner.run_cancelled = true;
                inner.next_run = None;
                self.shared.set_state(QueueState::Cancelling);
            }

            self.shared.emit(QueueEvent::Cancelled {
                dropped,
                killed_active: kill.is_some(),
            });
            (dropped, kill)
        };

        let killed_active = kill.is_some();
        if let Some(kill) = kill {
            kill.kill();
        }
        info!(dropped, killed_active, "Queue cancelled");
        dropped
    }

    /// Number of items waiting (excludes the active item).
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Returns true when no items are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current processor state.
    #[must_use]
    pub fn state(&self) -> QueueState {
        *self.shared.state.borrow()
    }

    /// Returns true while a processor task exists.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() != QueueState::Idle
    }

    /// Overall progress of the current or most recent run, 0.0..=1.0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.shared.lock().run.fraction()
    }

    /// Counters of the current or most recent run.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.shared.lock().run.clone()
    }

    /// Waits until the processor has exited.
    pub async fn wait_idle(&self) {
        let mut state = self.shared.state.subscribe();
        // The sender lives in `self`, so this only returns once idle.
        let _ = state.wait_for(|s| *s == QueueState::Idle).await;
    }
}

async fn run_processor(shared: Arc<Shared>, mut shutdown: Arc<AtomicBool>) {
    debug!(extractor = shared.extractor.name(), "Queue processor running");

    while let Some((item, cancel)) = shared.next_item(&mut shutdown) {
        debug!(source_id = %item.source_id, file = %item.target_filename, "Processing item");
        shared.emit(QueueEvent::ItemStarted { item: item.clone() });

        let source_id = item.source_id.clone();
        let on_progress = |percent: f32| {
            shared.emit(QueueEvent::ItemProgress {
                source_id: source_id.clone(),
                percent,
            });
        };

        let result = shared
            .extractor
            .extract(&item, &shared.destination, &on_progress, cancel)
            .await;
        shared.finish_item(item, result);
    }

    debug!("Queue processor exited");
}
