//! CLI command handlers.

mod config;
mod dry_run;
mod library;

pub use config::run_config_show_command;
pub use dry_run::run_dry_run_preview;
pub use library::run_library_command;
