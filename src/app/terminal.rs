//! What the attached terminal can show, and log subscriber setup.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Terminal capabilities, read once from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TerminalProfile {
    /// `NO_COLOR` is set to a non-empty value.
    pub(crate) no_color_env: bool,
    /// `TERM=dumb`.
    pub(crate) dumb: bool,
    /// stderr is attached to a terminal.
    pub(crate) stderr_tty: bool,
}

impl TerminalProfile {
    pub(crate) fn detect() -> Self {
        Self {
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
            dumb: std::env::var("TERM").is_ok_and(|value| value.eq_ignore_ascii_case("dumb")),
            stderr_tty: io::stderr().is_terminal(),
        }
    }

    /// ANSI colour is off when `--no-color`, `NO_COLOR` or a dumb terminal asks for it.
    pub(crate) fn ansi(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// The per-track bar redraws in place, so it needs an interactive stderr.
    pub(crate) fn progress_bar(self, quiet: bool) -> bool {
        self.stderr_tty && !self.dumb && !quiet
    }
}

/// Where the log level comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFilter<'a> {
    /// `RUST_LOG` when it parses, else the given directive.
    EnvOr(&'a str),
    /// The given directive; `-v`/`-q` on the command line beat `RUST_LOG`.
    Fixed(&'a str),
}

impl LogFilter<'_> {
    pub(crate) fn from_cli(directive: &str, forced: bool) -> LogFilter<'_> {
        if forced {
            LogFilter::Fixed(directive)
        } else {
            LogFilter::EnvOr(directive)
        }
    }

    fn build(self) -> EnvFilter {
        match self {
            Self::Fixed(directive) => EnvFilter::new(directive),
            Self::EnvOr(directive) => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
            }
        }
    }
}

/// Installs the stderr subscriber. Later calls are ignored.
pub(crate) fn init_tracing(filter: LogFilter<'_>, ansi: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .with_env_filter(filter.build())
        .try_init();
}
