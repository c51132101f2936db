//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "JAZZY_BENCH_LOG";

const DEFAULT_FILTER: &str = "jazzy_bench_ingest=info";

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Reads `JAZZY_BENCH_LOG` (e.g. `JAZZY_BENCH_LOG=jazzy_bench_ingest::console=trace`)
/// and falls back to `jazzy_bench_ingest=info`. Output goes to stderr so a report
/// printed on stdout stays valid JSON. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
