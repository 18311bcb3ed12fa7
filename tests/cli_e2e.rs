//! End-to-end CLI tests for the tunegrab binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

mod support;

fn write_tunegrab_config(config_home: &std::path::Path, contents: &str) {
    let config_dir = config_home.join("tunegrab");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

fn toml_path(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

fn tunegrab(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tunegrab").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

/// Without links the binary prints quick-start guidance and succeeds.
#[test]
fn test_binary_without_links_shows_guidance() {
    let tempdir = TempDir::new().unwrap();
    tunegrab(&tempdir.path().join("xdg-config"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No links provided"))
        .stdout(predicate::str::contains("open.spotify.com"));
}

#[test]
fn test_binary_help_displays_usage_and_exit_codes() {
    let mut cmd = Command::cargo_bin("tunegrab").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download Spotify and YouTube tracks"))
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("130 = cancelled"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("tunegrab").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tunegrab"));
}

#[test]
fn test_binary_invalid_fragments_is_usage_error() {
    let mut cmd = Command::cargo_bin("tunegrab").unwrap();
    cmd.args(["--fragments", "0", "https://youtu.be/abc"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_binary_config_show_missing_file_uses_defaults() {
    let tempdir = TempDir::new().unwrap();
    tunegrab(&tempdir.path().join("xdg-config"))
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "config_file = not found (using defaults)",
        ))
        .stdout(predicate::str::contains("output_dir = ."))
        .stdout(predicate::str::contains("fragments = 1"))
        .stdout(predicate::str::contains("max_size_mb = unlimited"))
        .stdout(predicate::str::contains("metadata_timeout_secs = 45"))
        .stdout(predicate::str::contains("verbosity = default"));
}

#[test]
fn test_binary_config_show_loads_xdg_file() {
    let tempdir = TempDir::new().unwrap();
    let config_home = tempdir.path().join("xdg-config");
    let configured_output = tempdir.path().join("configured-music");
    write_tunegrab_config(
        &config_home,
        &format!(
            "output_dir = \"{}\"\nfragments = 4\nmax_size_mb = 25\nmetadata_timeout_secs = 10\nverbosity = \"debug\"\n",
            toml_path(&configured_output)
        ),
    );

    tunegrab(&config_home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains(format!(
            "output_dir = {}",
            configured_output.display()
        )))
        .stdout(predicate::str::contains("fragments = 4"))
        .stdout(predicate::str::contains("max_size_mb = 25"))
        .stdout(predicate::str::contains("metadata_timeout_secs = 10"))
        .stdout(predicate::str::contains("verbosity = debug"));
}

#[test]
fn test_binary_invalid_config_file_fails() {
    let tempdir = TempDir::new().unwrap();
    let config_home = tempdir.path().join("xdg-config");
    write_tunegrab_config(&config_home, "colour = \"blue\"\n");

    tunegrab(&config_home)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_binary_library_lists_mp3_files() {
    let tempdir = TempDir::new().unwrap();
    let music = tempdir.path().join("music");
    std::fs::create_dir_all(&music).unwrap();
    std::fs::write(music.join("Queen - Bohemian Rhapsody.mp3"), b"x").unwrap();
    std::fs::write(music.join("ABBA - Waterloo.mp3"), b"x").unwrap();
    std::fs::write(music.join("cover.jpg"), b"x").unwrap();

    let assert = tunegrab(&tempdir.path().join("xdg-config"))
        .arg("library")
        .arg("-o")
        .arg(&music)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

    let abba = stdout.find("ABBA - Waterloo.mp3").unwrap();
    let queen = stdout.find("Queen - Bohemian Rhapsody.mp3").unwrap();
    assert!(abba < queen, "library must be sorted: {stdout}");
    assert!(!stdout.contains("cover.jpg"));
    assert!(stdout.contains("2 track(s)"));
}

#[test]
fn test_binary_library_query_without_matches() {
    let tempdir = TempDir::new().unwrap();
    tunegrab(&tempdir.path().join("xdg-config"))
        .args(["library", "nothing"])
        .arg("-o")
        .arg(tempdir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracks matching 'nothing'"));
}

#[cfg(unix)]
mod with_fake_tools {
    use super::*;
    use super::support::fake_tools::{FFMPEG_STUB, YT_DLP_FULL, write_script};
    use super::support::loopback::start_mock_server_or_skip;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    struct Tools {
        _dir: TempDir,
        yt_dlp: std::path::PathBuf,
        ffmpeg: std::path::PathBuf,
    }

    fn tools() -> Tools {
        let dir = TempDir::new().unwrap();
        let yt_dlp = write_script(dir.path(), "yt-dlp", YT_DLP_FULL);
        let ffmpeg = write_script(dir.path(), "ffmpeg", FFMPEG_STUB);
        Tools {
            _dir: dir,
            yt_dlp,
            ffmpeg,
        }
    }

    #[test]
    fn test_binary_unsupported_link_fails() {
        let tempdir = TempDir::new().unwrap();
        let tools = tools();

        tunegrab(&tempdir.path().join("xdg-config"))
            .arg("--yt-dlp")
            .arg(&tools.yt_dlp)
            .arg("--ffmpeg")
            .arg(&tools.ffmpeg)
            .arg("-o")
            .arg(tempdir.path().join("music"))
            .arg("https://soundcloud.com/someone/track")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("unsupported link"));
    }

    #[test]
    fn test_binary_missing_yt_dlp_fails() {
        let tempdir = TempDir::new().unwrap();

        tunegrab(&tempdir.path().join("xdg-config"))
            .arg("--yt-dlp")
            .arg(tempdir.path().join("no-such-yt-dlp"))
            .arg("https://youtu.be/dQw4w9WgXcQ")
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found at configured path"));
    }

    #[test]
    fn test_binary_downloads_youtube_link() {
        let tempdir = TempDir::new().unwrap();
        let music = tempdir.path().join("music");
        let tools = tools();

        tunegrab(&tempdir.path().join("xdg-config"))
            .arg("--yt-dlp")
            .arg(&tools.yt_dlp)
            .arg("--ffmpeg")
            .arg(&tools.ffmpeg)
            .arg("-o")
            .arg(&music)
            .arg("https://youtu.be/dQw4w9WgXcQ")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 downloaded, 0 failed"));

        assert!(music.join("Never Gonna Give You Up.mp3").exists());
    }

    #[test]
    fn test_binary_second_run_skips_existing_file() {
        let tempdir = TempDir::new().unwrap();
        let music = tempdir.path().join("music");
        std::fs::create_dir_all(&music).unwrap();
        std::fs::write(music.join("Never Gonna Give You Up.mp3"), b"old").unwrap();
        let tools = tools();

        tunegrab(&tempdir.path().join("xdg-config"))
            .arg("--yt-dlp")
            .arg(&tools.yt_dlp)
            .arg("--ffmpeg")
            .arg(&tools.ffmpeg)
            .arg("-o")
            .arg(&music)
            .arg("https://youtu.be/dQw4w9WgXcQ")
            .assert()
            .success()
            .stdout(predicate::str::contains("already downloaded"));

        assert_eq!(
            std::fs::read(music.join("Never Gonna Give You Up.mp3")).unwrap(),
            b"old"
        );
    }

    #[tokio::test]
    async fn test_binary_dry_run_lists_spotify_tracks() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/api/spotify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tracks": [
                    {"videoId": "id1", "name": "Bohemian Rhapsody", "artist": "Queen"},
                    {"videoId": "id2", "name": "Waterloo", "artist": "ABBA"},
                    {"name": "No Video", "artist": "Nobody"},
                ]
            })))
            .mount(&mock_server)
            .await;

        let tempdir = TempDir::new().unwrap();
        let music = tempdir.path().join("music");
        let tools = tools();

        tunegrab(&tempdir.path().join("xdg-config"))
            .arg("--yt-dlp")
            .arg(&tools.yt_dlp)
            .arg("--api-base")
            .arg(mock_server.uri())
            .arg("--dry-run")
            .arg("--select")
            .arg("2")
            .arg("-o")
            .arg(&music)
            .arg("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M")
            .assert()
            .success()
            .stdout(predicate::str::contains("[queued] ABBA - Waterloo.mp3"))
            .stdout(predicate::str::contains("Bohemian Rhapsody").not())
            .stdout(predicate::str::contains("Dry run - no files downloaded"))
            .stderr(predicate::str::contains("Skipped No Video"));

        assert!(!music.exists(), "dry run must not create the output folder");
    }

    #[tokio::test]
    async fn test_binary_zip_includes_tracks_already_present() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/api/spotify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"videoId": "id1", "name": "Bohemian Rhapsody", "artist": "Queen"},
                {"videoId": "id2", "name": "Waterloo", "artist": "ABBA"},
            ])))
            .mount(&mock_server)
            .await;

        let tempdir = TempDir::new().unwrap();
        let music = tempdir.path().join("music");
        std::fs::create_dir_all(&music).unwrap();
        std::fs::write(music.join("Queen - Bohemian Rhapsody.mp3"), b"old").unwrap();
        let tools = tools();

        tunegrab(&tempdir.path().join("xdg-config"))
            .arg("--yt-dlp")
            .arg(&tools.yt_dlp)
            .arg("--ffmpeg")
            .arg(&tools.ffmpeg)
            .arg("--api-base")
            .arg(mock_server.uri())
            .arg("--zip")
            .arg("-o")
            .arg(&music)
            .arg("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 downloaded, 0 failed, 1 already present"))
            .stdout(predicate::str::contains("Archive:"));

        let archive = std::fs::File::open(music.join("downloaded_music.zip")).unwrap();
        let archive = zip::ZipArchive::new(archive).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["ABBA - Waterloo.mp3", "Queen - Bohemian Rhapsody.mp3"]);
    }
}
