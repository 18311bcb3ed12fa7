//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default number of concurrent fragments per download.
pub const DEFAULT_FRAGMENTS: u32 = 1;

/// Download Spotify and YouTube tracks as mp3 files.
///
/// Tunegrab resolves each link to one or more YouTube videos and extracts
/// their audio with yt-dlp, one track at a time, into a flat folder.
#[derive(Parser, Debug)]
#[command(name = "tunegrab")]
#[command(author, version, about)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "Exit codes:\n  0 = all tracks downloaded\n  1 = nothing downloaded or fatal error\n  2 = partial success\n  130 = cancelled with Ctrl-C")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub download: DownloadArgs,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List or search downloaded tracks
    Library(LibraryArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

/// Arguments for `tunegrab library`.
#[derive(Args, Debug, Clone)]
pub struct LibraryArgs {
    /// Case-insensitive text to match in file names
    pub query: Option<String>,

    /// Folder to list (default: configured output directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the default download flow.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct DownloadArgs {
    /// Spotify or YouTube links (tracks, playlists or videos)
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Folder the mp3 files are saved to (default: current directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Netscape cookie file passed to yt-dlp (default: ./cookies.txt when present)
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Path to the ffmpeg executable (default: found on PATH)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the yt-dlp executable (default: found on PATH)
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,

    /// Only pick audio streams smaller than this many megabytes (1-10000)
    #[arg(long, value_name = "MB", value_parser = clap::value_parser!(u64).range(1..=10_000))]
    pub max_size_mb: Option<u64>,

    /// Fragments yt-dlp downloads concurrently per track (1-16)
    #[arg(long, default_value_t = DEFAULT_FRAGMENTS, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub fragments: u32,

    /// Download only these tracks, by 1-based position (e.g. "1,3,5-7")
    #[arg(long, value_name = "LIST")]
    pub select: Option<String>,

    /// List the resolved tracks without downloading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Bundle the downloaded files into downloaded_music.zip
    #[arg(long)]
    pub zip: bool,

    /// Base URL the YouTube watch URL is appended to
    #[arg(long, value_name = "URL")]
    pub proxy_prefix: Option<String>,

    /// User-Agent header yt-dlp sends to the source site
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Referer header yt-dlp sends to the source site
    #[arg(long, value_name = "URL")]
    pub referer: Option<String>,

    /// Base URL of the Spotify metadata service
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Wait for yt-dlp to exit without reading its progress output
    #[arg(long)]
    pub no_progress_parse: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
