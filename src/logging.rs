//! Diagnostic logging to stderr
//!
//! Report output goes to stdout; everything emitted through `tracing` goes to
//! stderr so the two never interleave in a pipe.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the computed filter
pub const LOG_ENV: &str = "STOKER_LOG";

/// Map `-v`/`-q` counts to a default filter directive
#[must_use]
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber
///
/// `STOKER_LOG` takes precedence over the level derived from the flags.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
