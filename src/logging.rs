//! Logging setup for the `tm35fin-pages` binary.
//!
//! Log lines go to stderr since stdout carries the feature stream.
//! Verbosity follows `RUST_LOG` and defaults to `info`.

use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global tracing subscriber.
///
/// Fails if a subscriber has already been installed.
pub fn init_logging() -> Result<(), crate::PagesError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| crate::PagesError::IoError(e.to_string()))
}
