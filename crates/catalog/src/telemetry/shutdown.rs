//! Ordered flush-and-close of the three signal providers.

use std::time::Duration;

use opentelemetry_sdk::{logs::LoggerProvider, metrics::SdkMeterProvider, trace::TracerProvider};
use tracing::warn;

/// Default per-provider deadline for the final flush.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(5);

struct Providers {
    tracer: TracerProvider,
    logger: LoggerProvider,
    meter: Option<SdkMeterProvider>,
}

/// Owns the provider handles and drives their teardown exactly once.
///
/// Call [`TelemetryGuard::shutdown`] after the HTTP server has drained. The
/// providers close in the fixed order metrics → traces → logs, so failures in
/// the first two closes can still be diagnosed through the log pipeline. If
/// the guard is dropped without an explicit shutdown (panic or early-return
/// exit path), a best-effort synchronous close runs instead; the two paths
/// cannot both run because the handles are taken out of the guard.
pub struct TelemetryGuard {
    providers: Option<Providers>,
}

impl TelemetryGuard {
    pub(super) fn new(
        tracer: TracerProvider,
        logger: LoggerProvider,
        meter: Option<SdkMeterProvider>,
    ) -> Self {
        Self {
            providers: Some(Providers {
                tracer,
                logger,
                meter,
            }),
        }
    }

    /// Flush and close all providers in order: metrics, traces, logs.
    ///
    /// Each close runs on a blocking thread under the given deadline.
    /// Timeouts and flush errors are reported, never escalated — the process
    /// is exiting regardless. Invoking this a second time is a no-op.
    pub async fn shutdown(&mut self, deadline: Duration) {
        let Some(providers) = self.providers.take() else {
            return;
        };

        if let Some(meter) = providers.meter {
            close("metrics", deadline, move || {
                meter.shutdown().map_err(|e| e.to_string())
            })
            .await;
        }

        let tracer = providers.tracer;
        close("traces", deadline, move || {
            tracer.shutdown().map_err(|e| e.to_string())
        })
        .await;

        // Last, so everything above could still be logged.
        let logger = providers.logger;
        close("logs", deadline, move || {
            logger.shutdown().map_err(|e| e.to_string())
        })
        .await;
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let Some(providers) = self.providers.take() else {
            return;
        };
        if let Some(meter) = providers.meter {
            let _ = meter.shutdown();
        }
        let _ = providers.tracer.shutdown();
        let _ = providers.logger.shutdown();
    }
}

/// Run one provider close on a blocking thread, bounded by `deadline`.
async fn close<F>(signal: &'static str, deadline: Duration, f: F)
where
    F: FnOnce() -> Result<(), String> + Send + 'static,
{
    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(f)).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => warn!(signal, error = %e, "provider shutdown reported an error"),
        Ok(Err(e)) => warn!(signal, error = %e, "provider shutdown task failed"),
        Err(_) => warn!(
            signal,
            deadline_secs = deadline.as_secs(),
            "provider shutdown exceeded deadline; buffered data dropped"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_guard() -> TelemetryGuard {
        // Providers without exporters: nothing to flush, nothing to connect to.
        TelemetryGuard::new(
            TracerProvider::builder().build(),
            LoggerProvider::builder().build(),
            None,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_runs_once() {
        let mut guard = bare_guard();
        guard.shutdown(SHUTDOWN_DEADLINE).await;
        assert!(guard.providers.is_none());
        // Second invocation must be a no-op.
        guard.shutdown(SHUTDOWN_DEADLINE).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drop_after_shutdown_is_safe() {
        let mut guard = bare_guard();
        guard.shutdown(SHUTDOWN_DEADLINE).await;
        drop(guard);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn respects_short_deadline() {
        let mut guard = bare_guard();
        guard.shutdown(Duration::from_millis(100)).await;
        assert!(guard.providers.is_none());
    }
}
