//! Tracing setup for the CLI.
//!
//! Logs go to stderr so stdout stays reserved for command output.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber; `json` selects the JSON formatter.
pub fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Already initialised is fine.
    let _ = if json {
        builder
            .json()
            .with_target(true)
            .flatten_event(true)
            .try_init()
    } else {
        builder.with_target(false).try_init()
    };
}
