#[cfg(feature = "telemetry")]
use std::sync::OnceLock;

#[cfg(feature = "telemetry")]
use tracing_subscriber::{EnvFilter, fmt};

/// How chatty the linter's own logging is when `RUST_LOG` is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    pub fn default_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "loclint=error",
            Verbosity::Normal => "loclint=info",
            Verbosity::Verbose => "loclint=debug",
        }
    }
}

/// Initialize tracing subscriber once per process. Logs go to stderr so
/// they never mix with formatted results.
#[cfg(feature = "telemetry")]
pub fn init_tracing(verbosity: Verbosity) {
    static INIT: OnceLock<()> = OnceLock::new();

    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_verbosity: Verbosity) {}
