//! CLI output formatting and display helpers.

use std::path::Path;

use tracing::info;
use tunegrab_core::{RunSummary, SkippedTrack};

/// Message when no links were provided.
pub const NO_INPUT_GUIDANCE: &str = "No links provided. Pass Spotify or YouTube links as arguments.";

/// Example for a Spotify playlist.
pub const SPOTIFY_EXAMPLE: &str =
    "Example: tunegrab https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M";

/// Example for a YouTube video.
pub const YOUTUBE_EXAMPLE: &str = "Example: tunegrab https://youtu.be/dQw4w9WgXcQ";

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

pub fn quick_start_guidance_lines(width: usize) -> Vec<String> {
    vec![
        truncate_to_width(NO_INPUT_GUIDANCE, width),
        truncate_to_width(SPOTIFY_EXAMPLE, width),
        truncate_to_width(YOUTUBE_EXAMPLE, width),
    ]
}

/// Prints quick-start guidance to stdout.
pub fn print_quick_start_guidance() {
    let width = terminal_width().min(80);
    for line in quick_start_guidance_lines(width) {
        println!("{line}");
    }
}

/// Lines describing links that failed to resolve and tracks that were dropped.
pub(crate) fn render_resolution_feedback(
    failed_links: &[(String, String)],
    skipped_tracks: &[SkippedTrack],
    width: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (link, error) in failed_links {
        let first_line = error.lines().next().unwrap_or(error);
        lines.push(truncate_to_width(&format!("✗ {link}: {first_line}"), width));
    }
    for track in skipped_tracks {
        lines.push(truncate_to_width(
            &format!("• Skipped {} ({})", track.name, track.reason),
            width,
        ));
    }
    lines
}

pub(crate) fn print_resolution_feedback(
    failed_links: &[(String, String)],
    skipped_tracks: &[SkippedTrack],
) {
    for line in render_resolution_feedback(failed_links, skipped_tracks, terminal_width()) {
        eprintln!("{line}");
    }
}

pub(crate) fn completion_summary_line(summary: &RunSummary, cancelled: bool) -> String {
    let mut line = format!(
        "{} downloaded, {} failed, {} already present",
        summary.completed, summary.failed, summary.skipped
    );
    if cancelled {
        line.push_str(" (cancelled)");
    }
    line
}

pub(crate) fn print_completion_summary(
    summary: &RunSummary,
    cancelled: bool,
    output_dir: &Path,
    archive: Option<&Path>,
) {
    info!(
        completed = summary.completed,
        failed = summary.failed,
        skipped = summary.skipped,
        total = summary.total,
        output_dir = %output_dir.display(),
        "Download Summary"
    );
    println!("{}", completion_summary_line(summary, cancelled));
    println!("Saved to {}", output_dir.display());
    if let Some(archive) = archive {
        println!("Archive: {}", archive.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_width_returns_sensible_value() {
        assert!(terminal_width() >= 20);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("hello", 1), "…");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn test_quick_start_guidance_lines_fit_width() {
        for line in quick_start_guidance_lines(30) {
            assert!(line.chars().count() <= 30);
        }
    }

    #[test]
    fn test_render_resolution_feedback_uses_first_error_line() {
        let failed = vec![(
            "https://open.spotify.com/x".to_string(),
            "metadata fetch failed\n  Suggestion: retry".to_string(),
        )];
        let skipped = vec![SkippedTrack::new("Song", "no YouTube ID found")];
        let lines = render_resolution_feedback(&failed, &skipped, 200);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "✗ https://open.spotify.com/x: metadata fetch failed");
        assert_eq!(lines[1], "• Skipped Song (no YouTube ID found)");
    }

    #[test]
    fn test_completion_summary_line_marks_cancelled() {
        let summary = RunSummary {
            completed: 2,
            failed: 1,
            skipped: 3,
            total: 6,
            files: Vec::new(),
        };
        assert_eq!(
            completion_summary_line(&summary, false),
            "2 downloaded, 1 failed, 3 already present"
        );
        assert!(completion_summary_line(&summary, true).ends_with("(cancelled)"));
    }
}
