//! Log provider bootstrap: OTLP log exporter + batch processor.
//!
//! As with the span exporter, construction fails on malformed configuration
//! only; an unreachable collector surfaces as per-batch export errors.

use opentelemetry_sdk::{logs::LoggerProvider, runtime, Resource};

use super::error::TelemetryError;
use super::transport::TransportConfig;

/// Build the log provider over the shared exporter transport.
///
/// The batch processor buffers records and exports them asynchronously; the
/// `tracing` bridge layer installed by [`crate::telemetry::init`] routes all
/// structured log calls through this provider so records carry the resource
/// descriptor and, inside a request span, trace/span correlation ids.
///
/// # Errors
///
/// Returns [`TelemetryError::LogExporter`] if the OTLP exporter cannot be
/// built — fatal, since not even failure diagnostics could be exported.
pub fn start(
    transport: &TransportConfig,
    resource: Resource,
) -> Result<LoggerProvider, TelemetryError> {
    let exporter = transport
        .exporter_builder()
        .build_log_exporter()
        .map_err(TelemetryError::LogExporter)?;

    let provider = LoggerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::resource;

    #[tokio::test(flavor = "multi_thread")]
    async fn starts_without_reachable_collector() {
        let transport = TransportConfig::new("http://localhost:4317", "true");
        let provider = start(&transport, resource::build("catalog-svc")).unwrap();
        provider.shutdown().ok();
    }
}
