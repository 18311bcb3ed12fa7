//! CLI command routing: runs the Library and Config subcommands.
//!
//! If the user invoked a top-level command (e.g. `tunegrab library`), this
//! module runs the corresponding handler and returns the exit outcome.
//! Otherwise returns `None` so the caller continues with the download flow.

use anyhow::Result;

use crate::app::config_runtime;
use crate::app::terminal::{self, LogFilter, TerminalProfile};
use crate::cli::{Cli, Command, ConfigCommand};
use crate::{ProcessExit, commands};

/// If `cli` has a top-level command, run it and return `Some(exit)`; otherwise return `None`.
pub(crate) fn try_dispatch(
    cli: &Cli,
    cli_sources: &config_runtime::CliValueSources,
) -> Result<Option<ProcessExit>> {
    let Some(command) = &cli.command else {
        return Ok(None);
    };

    terminal::init_tracing(
        LogFilter::EnvOr("warn"),
        TerminalProfile::detect().ansi(cli.download.no_color),
    );

    match command {
        Command::Library(library_args) => {
            commands::run_library_command(library_args, &cli.download, cli_sources)?;
        }
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                commands::run_config_show_command(&cli.download, cli_sources)?;
            }
        },
    }

    Ok(Some(ProcessExit::Success))
}
