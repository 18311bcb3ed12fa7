//! Configuration lifecycle: load file config, merge CLI, resolve timeouts.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::app::config_runtime::{self, CliValueSources};
use crate::app_config::load_default_file_config;
use crate::cli::DownloadArgs;

/// Resolved configuration bundle used to build `RunContext`.
pub(crate) struct ResolvedConfig {
    pub(crate) args: DownloadArgs,
    pub(crate) metadata_timeout: Duration,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) loaded_from_file: bool,
}

/// Load file config and merge CLI overrides into one resolved bundle.
pub(crate) fn resolve_config(
    download: &DownloadArgs,
    cli_sources: &CliValueSources,
) -> Result<ResolvedConfig> {
    let loaded_config = load_default_file_config()?;
    let args = config_runtime::apply_config_defaults(
        download.clone(),
        cli_sources,
        loaded_config.config.as_ref(),
    )?;
    let metadata_timeout = config_runtime::resolve_metadata_timeout(loaded_config.config.as_ref());
    Ok(ResolvedConfig {
        args,
        metadata_timeout,
        config_path: loaded_config.path,
        loaded_from_file: loaded_config.loaded_from_file,
    })
}
