//! Telemetry bootstrap errors and their escalation policy.

use thiserror::Error;

/// How a bootstrap failure must be escalated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort startup: the signal would be silently absent for the whole
    /// process lifetime.
    Fatal,
    /// Report and continue with reduced observability.
    Degraded,
}

/// Errors produced while constructing the telemetry pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The OTLP span exporter could not be built.
    #[error("failed to build OTLP span exporter: {0}")]
    TraceExporter(opentelemetry::trace::TraceError),

    /// The OTLP log exporter could not be built.
    #[error("failed to build OTLP log exporter: {0}")]
    LogExporter(opentelemetry::logs::LogError),

    /// The OTLP metric pipeline could not be built.
    #[error("failed to build OTLP metric pipeline: {0}")]
    MetricPipeline(opentelemetry::metrics::MetricsError),

    /// The global tracing subscriber was already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

impl TelemetryError {
    /// The escalation policy for this failure.
    ///
    /// Trace, log, and subscriber failures are fatal; a metric pipeline
    /// failure degrades the service but does not stop it.
    pub fn severity(&self) -> Severity {
        match self {
            TelemetryError::TraceExporter(_)
            | TelemetryError::LogExporter(_)
            | TelemetryError::Subscriber(_) => Severity::Fatal,
            TelemetryError::MetricPipeline(_) => Severity::Degraded,
        }
    }
}
