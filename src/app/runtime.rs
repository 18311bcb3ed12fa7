use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};
use tunegrab_core::download::DEFAULT_ARCHIVE_NAME;
use tunegrab_core::tools::{FFMPEG, YT_DLP};
use tunegrab_core::{
    DEFAULT_METADATA_API_BASE, ItemOptions, Observation, YtDlpConfig, bundle_zip, locate_tool,
};

use crate::app::exit_handler::RunTally;
use crate::app::terminal::{self, LogFilter, TerminalProfile};
use crate::app::{
    command_dispatcher, config_manager, config_runtime, context, download_orchestrator,
    resolution_orchestrator, selection, validation,
};
use crate::{ProcessExit, commands, output};

/// Default cookies file, passed to yt-dlp when present.
const DEFAULT_COOKIES_FILE: &str = "cookies.txt";

const BYTES_PER_MB: u64 = 1024 * 1024;

pub(crate) async fn run_tunegrab() -> Result<ProcessExit> {
    let (cli, cli_sources) = config_runtime::parse_cli_with_sources();

    if let Some(exit) = command_dispatcher::try_dispatch(&cli, &cli_sources)? {
        return Ok(exit);
    }

    validation::reject_misplaced_subcommand(&cli.download.urls)?;
    let resolved = config_manager::resolve_config(&cli.download, &cli_sources)?;

    let term = TerminalProfile::detect();
    let default_level = config_runtime::resolve_default_log_level(&resolved.args);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    terminal::init_tracing(
        LogFilter::from_cli(default_level, force_cli_log_level),
        term.ansi(resolved.args.no_color),
    );

    debug!(args = ?resolved.args, "CLI arguments parsed");

    validation::validate_http_base("--api-base", resolved.args.api_base.as_deref())?;
    validation::validate_http_base("--proxy-prefix", resolved.args.proxy_prefix.as_deref())?;

    if resolved.args.urls.is_empty() {
        output::print_quick_start_guidance();
        return Ok(ProcessExit::Success);
    }

    info!(links = resolved.args.urls.len(), "Tunegrab starting");

    let output_dir = resolved
        .args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    if !resolved.args.dry_run && !output_dir.exists() {
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory '{}'", output_dir.display())
        })?;
        info!(dir = %output_dir.display(), "Created output directory");
    }

    let ctx = build_run_context(resolved, output_dir)?;

    let resolution = resolution_orchestrator::run_resolution(&ctx).await;
    output::print_resolution_feedback(&resolution.failed_links, &resolution.skipped_tracks);

    if resolution.all_links_failed() {
        let first_error = resolution
            .failed_links
            .first()
            .map_or("unknown resolver failure", |(_, error)| error.as_str());
        bail!(
            "All links failed to resolve ({}/{}).\n  \
             First error: {first_error}",
            resolution.failed_links.len(),
            resolution.link_count
        );
    }

    let mut items = resolution.items;
    if let Some(list) = ctx.args.select.as_deref() {
        let indices = selection::parse_selection(list, items.len())?;
        items = selection::apply_selection(items, &indices);
        info!(selected = items.len(), "Applied track selection");
    }

    if ctx.args.dry_run {
        commands::run_dry_run_preview(&items, &ctx.output_dir);
        return Ok(ProcessExit::Success);
    }

    if items.is_empty() {
        info!("No tracks to download");
        return Ok(RunTally::resolution_only(resolution.failed_links.len()).exit());
    }

    let use_bar = term.progress_bar(ctx.args.quiet);
    let outcome = download_orchestrator::run_download(&ctx, items, use_bar).await?;
    let summary = &outcome.summary;

    info!(
        completed = summary.completed,
        failed = summary.failed,
        skipped = summary.skipped,
        "Download complete"
    );

    let archive = if ctx.args.zip && outcome.available.len() > 1 && !outcome.cancelled {
        Some(write_archive(&outcome.available, &ctx.output_dir)?)
    } else {
        None
    };

    if !ctx.args.quiet {
        output::print_completion_summary(
            summary,
            outcome.cancelled,
            &ctx.output_dir,
            archive.as_deref(),
        );
    }

    if outcome.cancelled {
        warn!(
            completed = summary.completed,
            "Interrupted. Run again to fetch the remaining tracks."
        );
    }

    Ok(RunTally::after_download(summary, resolution.failed_links.len(), outcome.cancelled).exit())
}

/// Locates the external tools and assembles the per-run settings.
fn build_run_context(
    resolved: config_manager::ResolvedConfig,
    output_dir: PathBuf,
) -> Result<context::RunContext> {
    let args = resolved.args;

    let yt_dlp = locate_tool(YT_DLP, args.yt_dlp.as_deref())?;
    let mut ytdlp = YtDlpConfig::new(yt_dlp);
    if !args.dry_run {
        ytdlp.ffmpeg_location = Some(locate_tool(FFMPEG, args.ffmpeg.as_deref())?);
    }
    ytdlp.cookies_file = Some(
        args.cookies
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COOKIES_FILE)),
    );
    ytdlp.user_agent.clone_from(&args.user_agent);
    ytdlp.referer.clone_from(&args.referer);
    ytdlp.proxy_prefix.clone_from(&args.proxy_prefix);
    if args.no_progress_parse {
        ytdlp.observation = Observation::FireAndWait;
    }

    let item_options = ItemOptions {
        size_limit_bytes: args.max_size_mb.map(|mb| mb * BYTES_PER_MB),
        parallel_fragments: args.fragments,
    };

    let api_base = args
        .api_base
        .clone()
        .unwrap_or_else(|| DEFAULT_METADATA_API_BASE.to_string());

    Ok(context::RunContext {
        args,
        output_dir,
        api_base,
        metadata_timeout: resolved.metadata_timeout,
        ytdlp,
        item_options,
    })
}

fn write_archive(files: &[PathBuf], output_dir: &Path) -> Result<PathBuf> {
    let archive_path = output_dir.join(DEFAULT_ARCHIVE_NAME);
    let path = bundle_zip(files, &archive_path)
        .with_context(|| format!("Failed to write archive '{}'", archive_path.display()))?;
    info!(archive = %path.display(), files = files.len(), "Bundled downloads");
    Ok(path)
}
