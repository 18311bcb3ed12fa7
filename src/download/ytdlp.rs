//! `yt-dlp` invocation for audio extraction.
//!
//! The extractor builds an argument list for one item, runs the tool on the
//! calling task, and optionally reads its combined stdout/stderr line by
//! line for progress. The output template is keyed by the video id; the
//! produced file is moved to its sanitized name only after success.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, trace, warn};

use super::extractor::{AudioExtractor, CancelSignal};
use super::progress::Transcript;
use super::{DownloadItem, ExtractError};

/// Base URL for YouTube watch pages.
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Bytes per megabyte as yt-dlp's `M` suffix understands it.
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Diagnostic used when the tool failed without writing to stderr.
const UNKNOWN_ERROR: &str = "Unknown error";

/// How the extractor observes a running tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observation {
    /// Read output line by line for progress and the produced path.
    #[default]
    Streaming,
    /// Inspect only the exit code and the fixed-pattern output file.
    FireAndWait,
}

/// Settings shared by every yt-dlp invocation.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Path or name of the yt-dlp executable.
    pub program: PathBuf,
    /// Location of ffmpeg, passed via `--ffmpeg-location`.
    pub ffmpeg_location: Option<PathBuf>,
    /// Netscape cookie jar, passed through when it exists on disk.
    pub cookies_file: Option<PathBuf>,
    /// Custom `User-Agent` header for the source site.
    pub user_agent: Option<String>,
    /// Custom `Referer` header for the source site.
    pub referer: Option<String>,
    /// Base URL the watch URL is appended to (`{prefix}/{watch_url}`).
    pub proxy_prefix: Option<String>,
    /// Output observation strategy.
    pub observation: Observation,
}

impl YtDlpConfig {
    /// Creates a config for `program` with no optional settings.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ffmpeg_location: None,
            cookies_file: None,
            user_agent: None,
            referer: None,
            proxy_prefix: None,
            observation: Observation::default(),
        }
    }

    /// Arguments shared by download and metadata invocations.
    pub(crate) fn common_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if let Some(cookies) = self.cookies_file.as_deref() {
            if cookies.exists() {
                args.push("--cookies".into());
                args.push(cookies.into());
            } else {
                debug!(path = %cookies.display(), "Cookie file not present; continuing without it");
            }
        }
        if let Some(user_agent) = &self.user_agent {
            args.push("--add-header".into());
            args.push(format!("User-Agent:{user_agent}").into());
        }
        if let Some(referer) = &self.referer {
            args.push("--add-header".into());
            args.push(format!("Referer:{referer}").into());
        }
        args
    }
}

/// Builds the watch URL for `video_id`, optionally wrapped by a proxy prefix.
#[must_use]
pub fn watch_url(video_id: &str, proxy_prefix: Option<&str>) -> String {
    let url = format!("{WATCH_URL_BASE}{video_id}");
    match proxy_prefix.map(|p| p.trim_end_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{url}"),
        _ => url,
    }
}

/// Format selector: best audio, optionally bounded by a size ceiling in MB.
#[must_use]
pub fn size_limit_format(size_limit_bytes: Option<u64>) -> String {
    match size_limit_bytes {
        Some(bytes) => {
            let mb = bytes.div_ceil(BYTES_PER_MB).max(1);
            format!("bestaudio[filesize<{mb}M]/best[filesize<{mb}M]")
        }
        None => "bestaudio/best".to_string(),
    }
}

/// Builds the full yt-dlp argument list for downloading `item` into `destination`.
#[must_use]
pub fn build_download_args(
    config: &YtDlpConfig,
    item: &DownloadItem,
    destination: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    if let Some(ffmpeg) = config.ffmpeg_location.as_deref() {
        args.push("--ffmpeg-location".into());
        args.push(ffmpeg.into());
    }

    args.push("-f".into());
    args.push(size_limit_format(item.size_limit_bytes).into());
    args.push("-x".into());
    args.push("--audio-format".into());
    args.push("mp3".into());
    args.push("--newline".into());
    args.push("--no-playlist".into());

    args.extend(config.common_args());

    if item.parallel_fragments > 1 {
        args.push("--concurrent-fragments".into());
        args.push(item.parallel_fragments.to_string().into());
    }

    let template = destination.join(format!("{}.%(ext)s", item.source_id));
    args.push("--output".into());
    args.push(template.into());

    args.push(watch_url(&item.source_id, config.proxy_prefix.as_deref()).into());
    args
}

/// Extractor backed by the external yt-dlp executable.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    config: YtDlpConfig,
}

impl YtDlpExtractor {
    /// Creates an extractor with the given settings.
    #[must_use]
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    /// Returns the extractor's settings.
    #[must_use]
    pub fn config(&self) -> &YtDlpConfig {
        &self.config
    }

    fn locate_output(
        &self,
        item: &DownloadItem,
        destination: &Path,
        transcript: &Transcript,
    ) -> Result<PathBuf, ExtractError> {
        let expected = destination.join(format!("{}.mp3", item.source_id));
        if expected.exists() {
            return Ok(expected);
        }

        if self.config.observation == Observation::Streaming
            && let Some(recovered) = transcript.recovered_path()
            && recovered.exists()
        {
            debug!(path = %recovered.display(), "Recovered output path from tool output");
            return Ok(recovered);
        }

        Err(ExtractError::MissingOutput {
            source_id: item.source_id.clone(),
            expected,
            diagnostic: tool_diagnostic(transcript),
        })
    }
}

/// The tool's stderr, or a placeholder when it wrote nothing.
fn tool_diagnostic(transcript: &Transcript) -> String {
    let diagnostic = transcript.diagnostic();
    if diagnostic.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        diagnostic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputStream {
    Stdout,
    Stderr,
}

fn spawn_forwarder<R>(
    reader: Option<R>,
    stream: OutputStream,
    tx: mpsc::UnboundedSender<(OutputStream, String)>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(reader) = reader else {
        return;
    };
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    // Progress updates may be separated by carriage returns.
                    for segment in text.split(['\r', '\n']).filter(|s| !s.trim().is_empty()) {
                        if tx.send((stream, segment.to_string())).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    });
}

async fn move_file(from: &Path, to: &Path) -> Result<(), ExtractError> {
    if from == to {
        return Ok(());
    }
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    // Rename fails across filesystems; fall back to copy + remove.
    tokio::fs::copy(from, to)
        .await
        .map_err(|source| ExtractError::io(to, source))?;
    tokio::fs::remove_file(from)
        .await
        .map_err(|source| ExtractError::io(from, source))
}

#[async_trait]
impl AudioExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    #[instrument(skip(self, destination, on_progress, cancel), fields(source_id = %item.source_id))]
    async fn extract(
        &self,
        item: &DownloadItem,
        destination: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
        mut cancel: CancelSignal,
    ) -> Result<PathBuf, ExtractError> {
        let args = build_download_args(&self.config, item, destination);
        debug!(program = %self.config.program.display(), ?args, "Starting yt-dlp");

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExtractError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let (tx, mut lines) = mpsc::unbounded_channel();
        spawn_forwarder(child.stdout.take(), OutputStream::Stdout, tx.clone());
        spawn_forwarder(child.stderr.take(), OutputStream::Stderr, tx);

        let streaming = self.config.observation == Observation::Streaming;
        let finished = tokio::select! {
            result = async {
                let mut transcript = Transcript::default();
                while let Some((stream, line)) = lines.recv().await {
                    trace!(?stream, line = %line, "yt-dlp output");
                    if stream == OutputStream::Stderr {
                        transcript.push_stderr(line.clone());
                    }
                    if streaming && let Some(percent) = transcript.observe(&line) {
                        on_progress(percent);
                    }
                }
                child.wait().await.map(|status| (status, transcript))
            } => Some(result),
            () = cancel.cancelled() => None,
        };

        let Some(result) = finished else {
            warn!("Cancellation requested; terminating yt-dlp");
            if let Err(error) = child.kill().await {
                debug!(error = %error, "yt-dlp already exited");
            }
            return Err(ExtractError::Cancelled {
                source_id: item.source_id.clone(),
            });
        };

        let (status, transcript) =
            result.map_err(|source| ExtractError::io(&self.config.program, source))?;

        if !status.success() {
            return Err(ExtractError::ToolFailed {
                source_id: item.source_id.clone(),
                code: status.code(),
                diagnostic: tool_diagnostic(&transcript),
            });
        }

        let produced = self.locate_output(item, destination, &transcript)?;
        let final_path = destination.join(&item.target_filename);
        move_file(&produced, &final_path).await?;

        info!(file = %item.target_filename, "Extracted");
        Ok(std::path::absolute(&final_path).unwrap_or(final_path))
    }
}
