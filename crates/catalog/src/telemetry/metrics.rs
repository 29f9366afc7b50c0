//! Meter provider bootstrap and application instrument registration.

use opentelemetry::metrics::{Counter, Histogram, MeterProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_sdk::{metrics::SdkMeterProvider, runtime, Resource};

use super::error::TelemetryError;
use super::transport::TransportConfig;

/// Build the meter provider with a periodic OTLP reader.
///
/// # Errors
///
/// Returns [`TelemetryError::MetricPipeline`] if the pipeline cannot be
/// built. Unlike the trace and log bootstraps this is not fatal: the caller
/// reports the failure and continues without instruments.
pub fn start(
    transport: &TransportConfig,
    resource: Resource,
) -> Result<SdkMeterProvider, TelemetryError> {
    opentelemetry_otlp::new_pipeline()
        .metrics(runtime::Tokio)
        .with_exporter(transport.exporter_builder())
        .with_resource(resource)
        .build()
        .map_err(TelemetryError::MetricPipeline)
}

/// HTTP server instruments, registered once at startup and written to on
/// every request by the instrumentation middleware.
#[derive(Clone)]
pub struct HttpMetrics {
    /// Total requests served, by method, route, and status.
    pub requests: Counter<u64>,
    /// Wall-clock handler duration in seconds.
    pub duration: Histogram<f64>,
}

impl HttpMetrics {
    /// Register the application instruments on a named meter.
    pub fn register(provider: &SdkMeterProvider) -> Self {
        let meter = provider.meter(env!("CARGO_PKG_NAME"));
        Self {
            requests: meter
                .u64_counter("http.server.request.count")
                .with_description("Number of HTTP requests served")
                .with_unit("{request}")
                .init(),
            duration: meter
                .f64_histogram("http.server.request.duration")
                .with_description("Wall-clock HTTP handler duration")
                .with_unit("s")
                .init(),
        }
    }

    /// Record one completed request.
    pub fn record(&self, method: &str, route: &str, status: u16, elapsed_secs: f64) {
        let attrs = [
            KeyValue::new("http.request.method", method.to_owned()),
            KeyValue::new("http.route", route.to_owned()),
            KeyValue::new("http.response.status_code", i64::from(status)),
        ];
        self.requests.add(1, &attrs);
        self.duration.record(elapsed_secs, &attrs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::resource;

    #[tokio::test(flavor = "multi_thread")]
    async fn registers_instruments_and_records() {
        let transport = TransportConfig::new("http://localhost:4317", "true");
        let provider = start(&transport, resource::build("catalog-svc")).unwrap();
        let metrics = HttpMetrics::register(&provider);
        // Instrument writes are buffer-append only; no collector required.
        metrics.record("GET", "/books", 200, 0.003);
        provider.shutdown().ok();
    }
}
