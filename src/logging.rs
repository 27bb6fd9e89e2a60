//! Logging setup for the command line binary.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, ToolError};

/// Installs a global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when `verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
