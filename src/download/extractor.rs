//! The extraction seam between the work queue and the external tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{DownloadItem, ExtractError};

/// Trait implemented by anything that can turn a [`DownloadItem`] into a file.
///
/// The queue holds an `Arc<dyn AudioExtractor>` so the processor can be
/// driven by `yt-dlp` in production and by test doubles in tests.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn AudioExtractor>`.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Returns the extractor's name for logging.
    fn name(&self) -> &str;

    /// Extracts `item` into `destination`, returning the final file path.
    ///
    /// `on_progress` receives percent-complete values (0.0..=100.0) when the
    /// implementation can observe them. When `cancel` fires, the
    /// implementation must stop promptly and return
    /// [`ExtractError::Cancelled`].
    async fn extract(
        &self,
        item: &DownloadItem,
        destination: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
        cancel: CancelSignal,
    ) -> Result<PathBuf, ExtractError>;
}

/// Sending half of a kill switch: held by the queue for the active item.
#[derive(Debug)]
pub struct KillHandle {
    tx: oneshot::Sender<()>,
}

impl KillHandle {
    /// Signals termination. Has no effect if the item already finished.
    pub fn kill(self) {
        let _ = self.tx.send(());
    }
}

/// Receiving half of a kill switch: handed to the extractor.
#[derive(Debug)]
pub struct CancelSignal {
    rx: Option<oneshot::Receiver<()>>,
    fired: bool,
}

impl CancelSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        Self {
            rx: None,
            fired: false,
        }
    }

    /// Completes once the paired [`KillHandle`] is used.
    ///
    /// If the handle is dropped without firing, this never completes.
    pub async fn cancelled(&mut self) {
        if self.fired {
            return;
        }
        if let Some(rx) = self.rx.as_mut() {
            if rx.await.is_ok() {
                self.fired = true;
                return;
            }
            self.rx = None;
        }
        std::future::pending::<()>().await;
    }
}

/// Creates a connected kill handle / cancel signal pair.
#[must_use]
pub fn kill_switch() -> (KillHandle, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (
        KillHandle { tx },
        CancelSignal {
            rx: Some(rx),
            fired: false,
        },
    )
}
