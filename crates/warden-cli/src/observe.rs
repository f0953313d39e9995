// Tracing setup for the CLI. Diagnostics go to stderr so they never mix
// with command output on stdout.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    // Prefer RUST_LOG from env, otherwise use the flag-derived level.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
