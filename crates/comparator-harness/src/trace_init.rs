//! One-time `tracing` subscriber setup for the harness binary.
//!
//! The filter comes from `COMPARATOR_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `warn`. Output goes to stderr so reports on stdout stay clean.

use std::sync::OnceLock;

use tracing::warn;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "COMPARATOR_LOG";

static INIT_GUARD: OnceLock<Result<(), String>> = OnceLock::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Later calls are no-ops, as is a call
/// after some other subscriber has already been installed.
pub fn init_tracing() {
    let result = INIT_GUARD.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err.to_string())
    });

    if let Err(err) = result {
        warn!("failed to initialise tracing subscriber: {err}");
    }
}
