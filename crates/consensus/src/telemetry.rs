//! Tracing subscriber setup for binaries and tests that want log output.

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to set global subscriber: {0}")]
    SetSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a global fmt subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `default_directive`
/// (e.g. `"info,quorum_consensus=debug"`). Fails if a global subscriber is
/// already installed.
pub fn init_tracing(default_directive: &str) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    let subscriber = Registry::default().with(env_filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(default_directive, "Tracing initialized");
    Ok(())
}
