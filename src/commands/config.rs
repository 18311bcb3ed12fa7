//! Config command handlers: show effective configuration.

use std::path::PathBuf;

use anyhow::Result;
use tunegrab_core::DEFAULT_METADATA_API_BASE;

use crate::app::config_manager::resolve_config;
use crate::app::config_runtime::{CliValueSources, verbosity_label};
use crate::cli::DownloadArgs;

pub fn run_config_show_command(
    download_args: &DownloadArgs,
    cli_sources: &CliValueSources,
) -> Result<()> {
    let resolved = resolve_config(download_args, cli_sources)?;
    let effective = &resolved.args;
    let output_dir = effective
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let resolved_path = resolved.config_path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if resolved.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("output_dir = {}", output_dir.display());
    println!(
        "api_base = {}",
        effective
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_API_BASE)
    );
    println!("cookies = {}", display_path_or(effective.cookies.as_ref(), "cookies.txt (if present)"));
    println!("ffmpeg = {}", display_path_or(effective.ffmpeg.as_ref(), "<PATH>"));
    println!("yt_dlp = {}", display_path_or(effective.yt_dlp.as_ref(), "<PATH>"));
    println!(
        "max_size_mb = {}",
        effective
            .max_size_mb
            .map_or_else(|| "unlimited".to_string(), |mb| mb.to_string())
    );
    println!("fragments = {}", effective.fragments);
    println!(
        "metadata_timeout_secs = {}",
        resolved.metadata_timeout.as_secs()
    );
    println!(
        "proxy_prefix = {}",
        effective.proxy_prefix.as_deref().unwrap_or("<none>")
    );
    println!(
        "verbosity = {}",
        verbosity_label(effective.verbose, effective.quiet)
    );

    Ok(())
}

fn display_path_or(path: Option<&PathBuf>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |path| path.display().to_string())
}
