//! Shared runtime context built after CLI/config and tool discovery.

use std::path::PathBuf;
use std::time::Duration;

use tunegrab_core::{ItemOptions, YtDlpConfig};

use crate::cli::DownloadArgs;

/// Holds shared state built during startup so the rest of `run_tunegrab`
/// can use `ctx.args`, `ctx.output_dir`, etc., instead of passing many arguments.
pub(crate) struct RunContext {
    pub(crate) args: DownloadArgs,
    pub(crate) output_dir: PathBuf,
    pub(crate) api_base: String,
    pub(crate) metadata_timeout: Duration,
    pub(crate) ytdlp: YtDlpConfig,
    pub(crate) item_options: ItemOptions,
}
