//! Application runtime composition modules.

pub(crate) mod command_dispatcher;
pub(crate) mod config_manager;
pub(crate) mod config_runtime;
pub(crate) mod context;
pub(crate) mod download_orchestrator;
pub(crate) mod exit_handler;
pub(crate) mod progress_manager;
pub(crate) mod resolution_orchestrator;
pub(crate) mod runtime;
pub(crate) mod selection;
pub(crate) mod terminal;
pub(crate) mod validation;
