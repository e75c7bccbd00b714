//! Console logging setup.
//!
//! One compact `tracing-subscriber` layer on stderr. The level comes from the
//! caller but can always be overridden through `RUST_LOG`, so a run can be
//! re-executed with `RUST_LOG=cadidaq=debug` to get the full per-device
//! identity dump without touching the configuration.

use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Initialize console logging at the given default level.
///
/// Idempotent: if a global subscriber is already installed (as happens when
/// multiple tests run in one process), the call is a no-op.
pub fn init(level: Level) -> Result<(), String> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .or_else(|e| {
            if e.to_string()
                .contains("a global default trace dispatcher has already been set")
            {
                Ok(())
            } else {
                Err(format!("failed to initialize logging: {e}"))
            }
        })
}

// `init_is_idempotent` lives in tests/logging_test.rs: it installs the real
// global subscriber, which must not happen in the lib test binary where
// `tracing_test::traced_test` needs to install its own.
