// Copyright 2026 Hypermesh Foundation. All rights reserved.
// League Projection Engine - Tracing Setup

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `LEAGUE_LOG=debug`.
pub const LOG_ENV: &str = "LEAGUE_LOG";

/// Install a formatted subscriber filtered by `LEAGUE_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Same as [`init_tracing`] with an explicit filter string, e.g. `league_engine=debug`.
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
