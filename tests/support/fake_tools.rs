//! Shell scripts standing in for `yt-dlp` and `ffmpeg`.

use std::path::{Path, PathBuf};

/// Prints the `--get-title --get-id` pair for one video.
pub const INFO_SINGLE: &str = r#"
case "$*" in
  *--get-title*) printf 'Never Gonna Give You Up\ndQw4w9WgXcQ\n'; exit 0 ;;
esac
exit 1
"#;

/// Prints two title/id pairs, as for a playlist.
pub const INFO_PLAYLIST: &str = r#"
case "$*" in
  *--get-title*) printf 'First Song\nid1\nSecond Song\nid2\n'; exit 0 ;;
esac
exit 1
"#;

/// Reports progress, then writes `<id>.mp3` where `--output` points.
pub const DOWNLOAD_OK: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  prev="$arg"
done
target=$(printf '%s' "$out" | sed 's/%(ext)s/mp3/')
echo "[youtube] Extracting URL"
echo "[download]  25.0% of 3.00MiB at 1.00MiB/s ETA 00:02"
echo "[download]  75.0% of 3.00MiB at 1.00MiB/s ETA 00:01"
echo "[download] 100% of 3.00MiB in 00:03"
echo "[ExtractAudio] Destination: $target"
printf 'ID3' > "$target"
exit 0
"#;

/// Writes the audio under a different name and only says so in its output.
pub const DOWNLOAD_ELSEWHERE: &str = r#"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  prev="$arg"
done
dir=$(dirname "$out")
echo "[ExtractAudio] Destination: $dir/renamed by tool.mp3"
printf 'ID3' > "$dir/renamed by tool.mp3"
exit 0
"#;

/// Fails with a yt-dlp style error on stderr.
pub const DOWNLOAD_FAILS: &str = r#"
echo "[youtube] Extracting URL"
echo "ERROR: [youtube] abc: Video unavailable" >&2
exit 1
"#;

/// Warns on stderr and exits cleanly without writing anything.
pub const DOWNLOAD_WRITES_NOTHING: &str = r#"
echo "WARNING: format not available, nothing written" >&2
exit 0
"#;

/// Never finishes on its own.
pub const DOWNLOAD_HANGS: &str = r#"
echo "[download]   1.0% of 3.00MiB"
exec sleep 30
"#;

/// Writes an executable `#!/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Answers info queries for one video and downloads like [`DOWNLOAD_OK`].
pub const YT_DLP_FULL: &str = r#"
case "$*" in
  *--get-title*) printf 'Never Gonna Give You Up\ndQw4w9WgXcQ\n'; exit 0 ;;
esac
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  prev="$arg"
done
target=$(printf '%s' "$out" | sed 's/%(ext)s/mp3/')
echo "[download] 100% of 3.00MiB in 00:03"
echo "[ExtractAudio] Destination: $target"
printf 'ID3' > "$target"
exit 0
"#;

/// Stands in for `ffmpeg`; only its existence is checked.
pub const FFMPEG_STUB: &str = "exit 0\n";
