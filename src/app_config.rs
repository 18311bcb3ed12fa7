//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// TOML-backed file configuration for tunegrab defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Default folder for downloads.
    pub output_dir: Option<PathBuf>,
    /// Base URL of the Spotify metadata service.
    pub api_base: Option<String>,
    /// Netscape cookie file passed to yt-dlp.
    pub cookies: Option<PathBuf>,
    /// Path to the ffmpeg executable.
    pub ffmpeg: Option<PathBuf>,
    /// Path to the yt-dlp executable.
    pub yt_dlp: Option<PathBuf>,
    /// Audio stream size ceiling in megabytes.
    pub max_size_mb: Option<u64>,
    /// Concurrent fragments per track.
    pub fragments: Option<u32>,
    /// Timeout for one metadata lookup, in seconds.
    pub metadata_timeout_secs: Option<u64>,
    /// Base URL the YouTube watch URL is appended to.
    pub proxy_prefix: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(fragments) = self.fragments
            && !(1..=16).contains(&fragments)
        {
            bail!("Invalid config value for `fragments`: {fragments}. Expected range: 1..=16");
        }

        if let Some(max_size_mb) = self.max_size_mb
            && !(1..=10_000).contains(&max_size_mb)
        {
            bail!(
                "Invalid config value for `max_size_mb`: {max_size_mb}. Expected range: 1..=10000"
            );
        }

        if let Some(timeout) = self.metadata_timeout_secs
            && !(1..=600).contains(&timeout)
        {
            bail!(
                "Invalid config value for `metadata_timeout_secs`: {timeout}. Expected range: 1..=600"
            );
        }

        validate_http_base("api_base", self.api_base.as_deref())?;
        validate_http_base("proxy_prefix", self.proxy_prefix.as_deref())?;
        Ok(())
    }
}

fn validate_http_base(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        bail!("Invalid config value for `{field}`: '{value}'. Expected an http(s) URL");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/tunegrab/config.toml`
/// 2. `$HOME/.config/tunegrab/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("tunegrab")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("tunegrab")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_no = line_index + 1;

        match key {
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(string_value(key, value, line_no)?));
            }
            "api_base" => {
                cfg.api_base = Some(string_value(key, value, line_no)?);
            }
            "cookies" => {
                cfg.cookies = Some(PathBuf::from(string_value(key, value, line_no)?));
            }
            "ffmpeg" => {
                cfg.ffmpeg = Some(PathBuf::from(string_value(key, value, line_no)?));
            }
            "yt_dlp" => {
                cfg.yt_dlp = Some(PathBuf::from(string_value(key, value, line_no)?));
            }
            "proxy_prefix" => {
                cfg.proxy_prefix = Some(string_value(key, value, line_no)?);
            }
            "max_size_mb" => {
                cfg.max_size_mb = Some(integer_value(key, value, line_no)?);
            }
            "metadata_timeout_secs" => {
                cfg.metadata_timeout_secs = Some(integer_value(key, value, line_no)?);
            }
            "fragments" => {
                let parsed = integer_value(key, value, line_no)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("fragments out of range for u32"))?;
                cfg.fragments = Some(n);
            }
            "verbosity" => {
                let parsed = string_value(key, value, line_no)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn string_value(key: &str, value: &str, line_no: usize) -> Result<String> {
    parse_string_literal(value).with_context(|| format!("Invalid `{key}` value on line {line_no}"))
}

fn integer_value(key: &str, value: &str, line_no: usize) -> Result<u64> {
    parse_integer_u64(value).with_context(|| format!("Invalid `{key}` value on line {line_no}"))
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
fragments = 4
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.fragments, Some(4));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_all_paths() {
        let cfg = parse_config_str(
            r#"
output_dir = "/home/me/Music"
cookies = "/home/me/cookies.txt"
ffmpeg = "/usr/bin/ffmpeg"
yt_dlp = "/usr/local/bin/yt-dlp"
api_base = "https://meta.example"
proxy_prefix = "https://proxy.example"
"#,
        )
        .expect("path config should parse");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/home/me/Music")));
        assert_eq!(cfg.cookies, Some(PathBuf::from("/home/me/cookies.txt")));
        assert_eq!(cfg.ffmpeg, Some(PathBuf::from("/usr/bin/ffmpeg")));
        assert_eq!(cfg.yt_dlp, Some(PathBuf::from("/usr/local/bin/yt-dlp")));
        assert_eq!(cfg.api_base.as_deref(), Some("https://meta.example"));
        assert_eq!(cfg.proxy_prefix.as_deref(), Some("https://proxy.example"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_fragments() {
        let err = parse_config_str("fragments = 0").expect_err("invalid fragments expected");
        assert!(err.to_string().contains("fragments"));
        let err = parse_config_str("fragments = 17").expect_err("invalid fragments expected");
        assert!(err.to_string().contains("fragments"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_max_size() {
        let err = parse_config_str("max_size_mb = 0").expect_err("invalid size expected");
        assert!(err.to_string().contains("max_size_mb"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout() {
        let err = parse_config_str("metadata_timeout_secs = 0").expect_err("invalid timeout");
        assert!(err.to_string().contains("metadata_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_non_http_api_base() {
        let err = parse_config_str(r#"api_base = "ftp://meta.example""#)
            .expect_err("non-http base expected");
        assert!(err.to_string().contains("api_base"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err =
            parse_config_str("fragments = 4 trailing").expect_err("expected trailing token error");
        assert!(err.to_string().contains("fragments"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("output_dir = /tmp/music").expect_err("unquoted path");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
fragments = 4 # per track
output_dir = "/music#1" # hash inside quotes is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.fragments, Some(4));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/music#1")));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("fragments 4").expect_err("syntax error expected");
        assert!(err.to_string().contains("expected key = value"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Verbose.as_str(), "verbose");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.as_str(), "debug");
    }
}
