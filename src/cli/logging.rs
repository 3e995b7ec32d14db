//! Diagnostic logging setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "JOURNL_LOG";

/// Filter used when `JOURNL_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "journl=warn";

/// Install the global subscriber; diagnostics go to stderr so stdout stays parseable
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
