use std::time::Duration;

use anyhow::{Result, bail};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use tunegrab_core::resolver::DEFAULT_METADATA_TIMEOUT_SECS;

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{Cli, DownloadArgs};

/// Records which download options were given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) api_base: bool,
    pub(crate) cookies: bool,
    pub(crate) ffmpeg: bool,
    pub(crate) yt_dlp: bool,
    pub(crate) max_size_mb: bool,
    pub(crate) fragments: bool,
    pub(crate) proxy_prefix: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Cli, CliValueSources) {
    let command = Cli::command();
    let matches = command.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = sources_from_matches(&matches);
    (cli, sources)
}

pub(crate) fn sources_from_matches(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        output_dir: is_commandline_value(matches, "output_dir"),
        api_base: is_commandline_value(matches, "api_base"),
        cookies: is_commandline_value(matches, "cookies"),
        ffmpeg: is_commandline_value(matches, "ffmpeg"),
        yt_dlp: is_commandline_value(matches, "yt_dlp"),
        max_size_mb: is_commandline_value(matches, "max_size_mb"),
        fragments: is_commandline_value(matches, "fragments"),
        proxy_prefix: is_commandline_value(matches, "proxy_prefix"),
        verbose: is_commandline_value(matches, "verbose"),
        quiet: is_commandline_value(matches, "quiet"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills options the user did not pass with values from the config file.
pub(crate) fn apply_config_defaults(
    mut args: DownloadArgs,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<DownloadArgs> {
    if let Some(file_config) = file_config {
        if !cli_sources.output_dir
            && args.output_dir.is_none()
            && let Some(output_dir) = &file_config.output_dir
        {
            args.output_dir = Some(output_dir.clone());
        }

        if !cli_sources.api_base
            && args.api_base.is_none()
            && let Some(api_base) = &file_config.api_base
        {
            args.api_base = Some(api_base.clone());
        }

        if !cli_sources.cookies
            && args.cookies.is_none()
            && let Some(cookies) = &file_config.cookies
        {
            args.cookies = Some(cookies.clone());
        }

        if !cli_sources.ffmpeg
            && args.ffmpeg.is_none()
            && let Some(ffmpeg) = &file_config.ffmpeg
        {
            args.ffmpeg = Some(ffmpeg.clone());
        }

        if !cli_sources.yt_dlp
            && args.yt_dlp.is_none()
            && let Some(yt_dlp) = &file_config.yt_dlp
        {
            args.yt_dlp = Some(yt_dlp.clone());
        }

        if !cli_sources.max_size_mb
            && args.max_size_mb.is_none()
            && let Some(max_size_mb) = file_config.max_size_mb
        {
            args.max_size_mb = Some(max_size_mb);
        }

        if !cli_sources.fragments
            && let Some(fragments) = file_config.fragments
        {
            args.fragments = fragments;
        }

        if !cli_sources.proxy_prefix
            && args.proxy_prefix.is_none()
            && let Some(proxy_prefix) = &file_config.proxy_prefix
        {
            args.proxy_prefix = Some(proxy_prefix.clone());
        }

        if !cli_sources.verbose
            && !cli_sources.quiet
            && let Some(verbosity) = file_config.verbosity
        {
            apply_config_verbosity(&mut args, verbosity);
        }
    }

    if !(1..=16).contains(&args.fragments) {
        bail!(
            "Invalid effective fragments value: {}. Expected range: 1..=16",
            args.fragments
        );
    }

    Ok(args)
}

fn apply_config_verbosity(args: &mut DownloadArgs, verbosity: VerbositySetting) {
    match verbosity {
        VerbositySetting::Default => {
            args.quiet = false;
            args.verbose = 0;
        }
        VerbositySetting::Verbose => {
            args.quiet = false;
            args.verbose = 1;
        }
        VerbositySetting::Quiet => {
            args.quiet = true;
            args.verbose = 0;
        }
        VerbositySetting::Debug => {
            args.quiet = false;
            args.verbose = 2;
        }
    }
}

pub(crate) fn resolve_metadata_timeout(file_config: Option<&FileConfig>) -> Duration {
    let secs = file_config
        .and_then(|config| config.metadata_timeout_secs)
        .unwrap_or(DEFAULT_METADATA_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

pub(crate) fn resolve_default_log_level(args: &DownloadArgs) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

pub(crate) fn verbosity_label(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        VerbositySetting::Quiet.as_str()
    } else if verbose == 0 {
        VerbositySetting::Default.as_str()
    } else if verbose == 1 {
        VerbositySetting::Verbose.as_str()
    } else {
        VerbositySetting::Debug.as_str()
    }
}
