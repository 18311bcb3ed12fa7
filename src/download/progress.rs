//! Best-effort parsing of yt-dlp output lines.
//!
//! yt-dlp output is not a contract. Lines that match a known shape update
//! progress or recover the produced path; every other line is ignored.
//!
//! Recognized shapes:
//! - `[download]  42.3% of 3.50MiB at 1.20MiB/s ETA 00:02` (any `<n>%` token)
//! - `[ExtractAudio] Destination: /music/abc.mp3`
//! - `[download] Destination: /music/abc.webm`
//! - `[download] /music/abc.mp3 has already been downloaded`

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static PERCENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:\.\d+)?)%").expect("percent regex is valid")
});

#[allow(clippy::expect_used)]
static EXTRACT_DESTINATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[ExtractAudio\] Destination: (.+)$").expect("extract destination regex is valid")
});

#[allow(clippy::expect_used)]
static DOWNLOAD_DESTINATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[download\] Destination: (.+)$").expect("download destination regex is valid")
});

#[allow(clippy::expect_used)]
static ALREADY_DOWNLOADED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[download\] (.+) has already been downloaded").expect("already-downloaded regex is valid")
});

/// A classified line of tool output.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolLine {
    /// Percent complete of the current download (0.0..=100.0).
    Progress(f32),
    /// The converted audio file being written.
    ExtractDestination(PathBuf),
    /// The raw media file being downloaded (before conversion).
    DownloadDestination(PathBuf),
    /// yt-dlp skipped the download because the file exists.
    AlreadyDownloaded(PathBuf),
    /// Anything else.
    Other,
}

/// Classifies one output line.
#[must_use]
pub fn parse_line(line: &str) -> ToolLine {
    let line = line.trim_end();

    if let Some(caps) = EXTRACT_DESTINATION_PATTERN.captures(line) {
        return ToolLine::ExtractDestination(PathBuf::from(caps[1].trim()));
    }
    if let Some(caps) = DOWNLOAD_DESTINATION_PATTERN.captures(line) {
        return ToolLine::DownloadDestination(PathBuf::from(caps[1].trim()));
    }
    if let Some(caps) = ALREADY_DOWNLOADED_PATTERN.captures(line) {
        return ToolLine::AlreadyDownloaded(PathBuf::from(caps[1].trim()));
    }
    if let Some(caps) = PERCENT_PATTERN.captures(line)
        && let Ok(percent) = caps[1].parse::<f32>()
        && (0.0..=100.0).contains(&percent)
    {
        return ToolLine::Progress(percent);
    }

    ToolLine::Other
}

/// Accumulated observations from one tool run.
#[derive(Debug, Default)]
pub struct Transcript {
    extract_destination: Option<PathBuf>,
    download_destination: Option<PathBuf>,
    already_downloaded: Option<PathBuf>,
    last_percent: Option<f32>,
    stderr: Vec<String>,
}

impl Transcript {
    /// Records one parsed line, returning the progress value if it had one.
    pub fn observe(&mut self, line: &str) -> Option<f32> {
        match parse_line(line) {
            ToolLine::Progress(percent) => {
                self.last_percent = Some(percent);
                return Some(percent);
            }
            ToolLine::ExtractDestination(path) => self.extract_destination = Some(path),
            ToolLine::DownloadDestination(path) => self.download_destination = Some(path),
            ToolLine::AlreadyDownloaded(path) => self.already_downloaded = Some(path),
            ToolLine::Other => {}
        }
        None
    }

    /// Keeps a stderr line for the diagnostic text.
    pub fn push_stderr(&mut self, line: String) {
        self.stderr.push(line);
    }

    /// Last progress value seen.
    #[must_use]
    pub fn last_percent(&self) -> Option<f32> {
        self.last_percent
    }

    /// Captured stderr, joined and trimmed.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        self.stderr.join("\n").trim().to_string()
    }

    /// Best guess at the produced audio file, from what the tool printed.
    ///
    /// Prefers the conversion destination, then an already-downloaded
    /// notice, then the raw download destination with an mp3 extension.
    #[must_use]
    pub fn recovered_path(&self) -> Option<PathBuf> {
        self.extract_destination
            .clone()
            .or_else(|| self.already_downloaded.clone())
            .or_else(|| {
                self.download_destination
                    .as_deref()
                    .map(|p| p.with_extension("mp3"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_line() {
        let line = "[download]  42.3% of 3.50MiB at  1.20MiB/s ETA 00:02";
        assert_eq!(parse_line(line), ToolLine::Progress(42.3));
    }

    #[test]
    fn test_parse_progress_integer_percent() {
        assert_eq!(
            parse_line("[download] 100% of 3.50MiB in 00:02"),
            ToolLine::Progress(100.0)
        );
    }

    #[test]
    fn test_parse_extract_destination() {
        assert_eq!(
            parse_line("[ExtractAudio] Destination: /music/abc.mp3"),
            ToolLine::ExtractDestination(PathBuf::from("/music/abc.mp3"))
        );
    }

    #[test]
    fn test_parse_download_destination() {
        assert_eq!(
            parse_line("[download] Destination: /music/abc.webm"),
            ToolLine::DownloadDestination(PathBuf::from("/music/abc.webm"))
        );
    }

    #[test]
    fn test_parse_already_downloaded() {
        assert_eq!(
            parse_line("[download] /music/abc.mp3 has already been downloaded"),
            ToolLine::AlreadyDownloaded(PathBuf::from("/music/abc.mp3"))
        );
    }

    #[test]
    fn test_parse_unrelated_line_is_other() {
        assert_eq!(parse_line("[youtube] abc: Downloading webpage"), ToolLine::Other);
        assert_eq!(parse_line(""), ToolLine::Other);
    }

    #[test]
    fn test_parse_out_of_range_percent_is_other() {
        assert_eq!(parse_line("weird 250% line"), ToolLine::Other);
    }

    #[test]
    fn test_transcript_prefers_extract_destination() {
        let mut transcript = Transcript::default();
        transcript.observe("[download] Destination: /music/abc.webm");
        assert_eq!(
            transcript.recovered_path(),
            Some(PathBuf::from("/music/abc.mp3"))
        );
        transcript.observe("[ExtractAudio] Destination: /music/other.mp3");
        assert_eq!(
            transcript.recovered_path(),
            Some(PathBuf::from("/music/other.mp3"))
        );
    }

    #[test]
    fn test_transcript_tracks_progress_and_stderr() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.observe("[download]  10.0% of 1MiB"), Some(10.0));
        assert_eq!(transcript.observe("[download]  55.5% of 1MiB"), Some(55.5));
        assert_eq!(transcript.last_percent(), Some(55.5));

        transcript.push_stderr("ERROR: first".to_string());
        transcript.push_stderr("ERROR: second  ".to_string());
        assert_eq!(transcript.diagnostic(), "ERROR: first\nERROR: second");
    }
}
