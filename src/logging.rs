//! Logging setup for the binary
//!
//! Events go to stderr so the report on stdout stays machine readable.

use std::io::{stderr, IsTerminal};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logger(default_level: &str) -> Result<(), String> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(stderr().is_terminal())
        .with_level(true)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(env_filter);

    registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
