//! Logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a `RUST_LOG`-driven subscriber writing to stderr, defaulting to
/// `info`. Calling it twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
