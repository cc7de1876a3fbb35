//! Global subscriber installation. Kept in its own test binary since the
//! subscriber is process-wide.

use quorum_consensus::telemetry::{init_tracing, TelemetryError};

#[test]
fn test_init_tracing_only_once() {
    init_tracing("info,quorum_consensus=debug").unwrap();
    tracing::info!("subscriber installed");

    assert!(matches!(
        init_tracing("debug"),
        Err(TelemetryError::SetSubscriber(_))
    ));
}
