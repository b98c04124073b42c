//! Logging setup for binaries and tests embedding the dispatcher.
//!
//! The crate itself only emits `tracing` events. `init_logging` installs a
//! console subscriber for hosts that have none.

use std::{env::var, sync::OnceLock};

use {
    tracing::debug,
    tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

/// Environment variable holding the crate's log filter.
pub const LOG_ENV: &str = "ERRDISPATCH_LOG";

/// Filter used when neither `ERRDISPATCH_LOG` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "info";

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs a formatted console subscriber.
///
/// The filter is read from `ERRDISPATCH_LOG`, then `RUST_LOG`, and falls
/// back to `info`. Calling this more than once, or after another global
/// subscriber was set, has no effect.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::new(log_filter());
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter),
        );

        if subscriber.try_init().is_err() {
            debug!("Global tracing subscriber already initialized, keeping it");
        }
    });
}

/// Resolves the filter directive from the environment.
fn log_filter() -> String {
    var(LOG_ENV)
        .or_else(|_| var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}
