//! OpenTelemetry setup: traces, structured logs, and metrics exported via OTLP/gRPC.
//!
//! All three signal providers are built from one [`Resource`] so every span,
//! log record, and metric point carries the same service identity. Trace and
//! log bootstrap failures abort startup: a process that can never emit either
//! signal would run unobservable for its whole lifetime. Metric bootstrap
//! failure only degrades the service (no instruments registered), which
//! mirrors the asymmetry of the original deployment.
//!
//! # Telemetry invariants
//!
//! - The resource attached to the trace, log, and metric providers is
//!   value-equal (same `service.name`, same `library.language`).
//! - Request-path instrumentation is buffer-append only; network I/O to the
//!   collector happens on the batch processors' background tasks.
//! - Each provider is shut down exactly once, in the order metrics → traces →
//!   logs, so late export failures still reach the log pipeline.

mod error;
mod logs;
mod metrics;
mod resource;
mod shutdown;
mod traces;
mod transport;

pub use error::{Severity, TelemetryError};
pub use metrics::HttpMetrics;
pub use shutdown::{TelemetryGuard, SHUTDOWN_DEADLINE};
pub use transport::{TransportConfig, TransportSecurity};

use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fully initialised telemetry pipeline.
pub struct Telemetry {
    /// Owns the provider handles; drives the ordered shutdown sequence.
    pub guard: TelemetryGuard,
    /// Application instruments, `None` when the metric pipeline failed to start.
    pub http_metrics: Option<HttpMetrics>,
}

/// Initialise the global tracing subscriber and all three OTLP pipelines.
///
/// Configures:
/// - A W3C `traceparent` propagator for inbound context extraction.
/// - An OTLP span pipeline (always-on sampler, batch processor).
/// - An OTLP log pipeline bridged from `tracing` events.
/// - An OTLP metric pipeline with the HTTP server instruments.
/// - A JSON-formatted [`tracing_subscriber`] layer for local log output.
///
/// # Errors
///
/// Returns a [`Severity::Fatal`] error if the span or log exporter cannot be
/// built, or if the subscriber is already installed. Metric pipeline failure
/// is [`Severity::Degraded`]: it is logged and the service continues without
/// instruments.
pub fn init(
    service_name: &str,
    transport: TransportConfig,
    log_level: &str,
) -> Result<Telemetry, TelemetryError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = resource::build(service_name);

    // Trace and log pipelines must come up or the process aborts.
    let tracer_provider = traces::start(&transport, resource.clone())?;
    let logger_provider = logs::start(&transport, resource.clone())?;

    let tracer = tracer_provider.tracer(env!("CARGO_PKG_NAME"));
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let log_bridge = OpenTelemetryTracingBridge::new(&logger_provider);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .with(otel_layer)
        .with(log_bridge)
        .try_init()?;

    // Escalation is decided by the error's classification: degraded failures
    // are logged (the subscriber is already up, so the degradation itself is
    // observable), fatal ones propagate.
    let (meter_provider, http_metrics) = match metrics::start(&transport, resource) {
        Ok(provider) => {
            let instruments = HttpMetrics::register(&provider);
            (Some(provider), Some(instruments))
        }
        Err(e) => match e.severity() {
            Severity::Degraded => {
                warn!(error = %e, "metric pipeline failed to start; continuing without metrics");
                (None, None)
            }
            Severity::Fatal => return Err(e),
        },
    };

    let guard = TelemetryGuard::new(tracer_provider, logger_provider, meter_provider);

    Ok(Telemetry { guard, http_metrics })
}
