//! Filename sanitization and on-disk deduplication for downloaded tracks.
//!
//! Final names follow `"{artist} - {name}.mp3"` or `"{name}.mp3"`. Filename
//! equality is the only dedup key: no checksum comparison is performed.

use std::path::Path;

/// Characters removed from names and artists before they reach the filesystem.
const DISALLOWED_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Artist values that mean "no artist" (compared case-insensitively).
pub const UNKNOWN_ARTIST_SENTINELS: [&str; 2] = ["N/A", "unknown"];

/// Extension of every produced file.
const AUDIO_EXTENSION: &str = "mp3";

/// Removes characters that are illegal in common filesystems.
///
/// Only the disallowed character class is touched; everything else, including
/// whitespace, is preserved. Applying the function twice yields the same
/// result as applying it once.
#[must_use]
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .filter(|c| !DISALLOWED_CHARS.contains(c))
        .collect()
}

fn is_unknown_artist(artist: &str) -> bool {
    let trimmed = artist.trim();
    trimmed.is_empty()
        || UNKNOWN_ARTIST_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Builds the final filename for a track.
///
/// Pattern with a known artist: `"{artist} - {name}.mp3"`
/// Pattern without one: `"{name}.mp3"`
#[must_use]
pub fn build_target_filename(name: &str, artist: Option<&str>) -> String {
    let name = sanitize_component(name);
    match artist.filter(|a| !is_unknown_artist(a)) {
        Some(artist) => format!(
            "{} - {name}.{AUDIO_EXTENSION}",
            sanitize_component(artist)
        ),
        None => format!("{name}.{AUDIO_EXTENSION}"),
    }
}

/// Returns true when `filename` already exists in `dir`.
#[must_use]
pub fn already_downloaded(dir: &Path, filename: &str) -> bool {
    dir.join(filename).exists()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_removes_each_disallowed_char() {
        for ch in DISALLOWED_CHARS {
            let input = format!("a{ch}b");
            assert_eq!(sanitize_component(&input), "ab", "failed to strip {ch:?}");
        }
    }

    #[test]
    fn test_sanitize_keeps_everything_else() {
        let input = "AC/DC: Back in Black (Live) & more! — ünïcode";
        assert_eq!(
            sanitize_component(input),
            "ACDC Back in Black (Live) & more! — ünïcode"
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = ["What? Why: \"Because\"", "a<b>c|d", "plain", "", "***"];
        for sample in samples {
            let once = sanitize_component(sample);
            assert_eq!(sanitize_component(&once), once);
        }
    }

    #[test]
    fn test_build_target_filename_with_artist() {
        assert_eq!(build_target_filename("X", Some("Y")), "Y - X.mp3");
    }

    #[test]
    fn test_build_target_filename_without_artist() {
        assert_eq!(build_target_filename("Song", None), "Song.mp3");
    }

    #[test]
    fn test_build_target_filename_sentinel_artist_ignored() {
        assert_eq!(build_target_filename("Clip", Some("N/A")), "Clip.mp3");
        assert_eq!(build_target_filename("Clip", Some("Unknown")), "Clip.mp3");
        assert_eq!(build_target_filename("Clip", Some("  ")), "Clip.mp3");
    }

    #[test]
    fn test_build_target_filename_sanitizes_both_parts() {
        assert_eq!(
            build_target_filename("Who/What?", Some("A:B")),
            "AB - WhoWhat.mp3"
        );
    }

    #[test]
    fn test_already_downloaded_detects_existing_file() {
        let temp = TempDir::new().unwrap();
        assert!(!already_downloaded(temp.path(), "Y - X.mp3"));
        std::fs::write(temp.path().join("Y - X.mp3"), b"id3").unwrap();
        assert!(already_downloaded(temp.path(), "Y - X.mp3"));
    }
}
