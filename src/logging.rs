//! Logging setup for the command-line entry point

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to stderr.
///
/// The level applies to this crate only; `RUST_LOG` replaces the whole filter
/// when set. Calling this twice leaves the first subscriber in place.
pub fn init_logging(level: &str) {
    let default_filter = format!("subspace_plots={level},warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init();

    if initialized.is_ok() {
        tracing::debug!(level, "logging initialized");
    }
}
