//! Console logging for both binaries.
//!
//! Events are filtered by `RUST_LOG` (default `info`) and printed through
//! `tracing_subscriber::fmt` with RFC 3339 local timestamps, thread ids, and
//! source locations.
//!
//! ```bash
//! RUST_LOG=pricepool=debug,tower_http=debug cargo run --bin pricepool-server
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;
    Ok(())
}
