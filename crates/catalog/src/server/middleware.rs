//! Request instrumentation middleware.
//!
//! Every inbound request gets a span named after its route. When the caller
//! propagated a W3C `traceparent`, the span continues that trace instead of
//! starting a new root. Per-request work here is buffer-append only; span and
//! metric export happens on the batch processors' background tasks.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TraceContextExt;
use tracing::{field::Empty, info_span, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::state::AppState;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct HeaderExtractor<'a>(&'a HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Extract a remote trace context from the request headers.
///
/// Returns `Some` only when the headers carry a valid remote span context;
/// in that case the request span becomes a continuation of the caller's
/// trace rather than a new root.
fn remote_context(headers: &HeaderMap) -> Option<opentelemetry::Context> {
    let carrier = HeaderExtractor(headers);
    let ctx =
        opentelemetry::global::get_text_map_propagator(|propagator| propagator.extract(&carrier));
    if ctx.span().span_context().is_valid() {
        Some(ctx)
    } else {
        None
    }
}

/// Start a span scoped to the request, run the handler inside it, and record
/// status, duration, and the HTTP instruments on completion.
pub async fn instrument_request(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().as_str().to_owned();
    // Prefer the matched route template so span names stay low-cardinality.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let span = info_span!(
        "http.request",
        otel.name = %format!("{method} {route}"),
        otel.kind = "server",
        http.request.method = %method,
        http.route = %route,
        http.response.status_code = Empty,
        otel.status_code = Empty,
    );
    if let Some(parent) = remote_context(req.headers()) {
        span.set_parent(parent);
    }

    let started = Instant::now();
    let response = next.run(req).instrument(span.clone()).await;
    // Wall-clock handler time, measured before any batching or flushing.
    let elapsed = started.elapsed().as_secs_f64();

    let status = response.status();
    span.record("http.response.status_code", u64::from(status.as_u16()));
    if status.is_server_error() {
        span.record("otel.status_code", "ERROR");
    }

    if let Some(metrics) = &state.metrics {
        metrics.record(&method, &route, status.as_u16(), elapsed);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use opentelemetry::global;
    use opentelemetry::trace::{SpanId, TraceId, TracerProvider as _};
    use opentelemetry_sdk::export::trace::SpanData;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
    use opentelemetry_sdk::trace::TracerProvider;
    use tower::ServiceExt;
    use tracing_subscriber::layer::SubscriberExt;

    const TRACEPARENT: &str = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";
    const UPSTREAM_TRACE_ID: &str = "0af7651916cd43dd8448eb211c80319c";
    const UPSTREAM_SPAN_ID: &str = "b7ad6b7169203331";

    fn headers_with(traceparent: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(tp) = traceparent {
            headers.insert("traceparent", tp.parse().unwrap());
        }
        headers
    }

    #[test]
    fn extracts_valid_upstream_context() {
        global::set_text_map_propagator(TraceContextPropagator::new());
        let ctx = remote_context(&headers_with(Some(TRACEPARENT))).unwrap();
        assert_eq!(
            ctx.span().span_context().trace_id().to_string(),
            "0af7651916cd43dd8448eb211c80319c"
        );
    }

    #[test]
    fn no_headers_means_new_root() {
        global::set_text_map_propagator(TraceContextPropagator::new());
        assert!(remote_context(&headers_with(None)).is_none());
    }

    #[test]
    fn malformed_traceparent_means_new_root() {
        global::set_text_map_propagator(TraceContextPropagator::new());
        assert!(remote_context(&headers_with(Some("garbage"))).is_none());
    }

    #[test]
    fn header_extractor_reads_values() {
        let headers = headers_with(Some(TRACEPARENT));
        let extractor = HeaderExtractor(&headers);
        assert_eq!(extractor.get("traceparent"), Some(TRACEPARENT));
        assert!(extractor.keys().contains(&"traceparent"));
    }

    /// Drive one request through the middleware with an in-memory span
    /// exporter installed, returning every span finished during the request.
    async fn spans_for_request(traceparent: Option<&str>) -> Vec<SpanData> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let tracer = provider.tracer("middleware-test");
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(tracer));
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route("/books", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                AppState::default(),
                instrument_request,
            ));

        let mut builder = Request::builder().uri("/books");
        if let Some(tp) = traceparent {
            builder = builder.header("traceparent", tp);
        }
        let resp = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        exporter.get_finished_spans().unwrap()
    }

    #[tokio::test]
    async fn request_without_upstream_context_starts_new_root() {
        let spans = spans_for_request(None).await;
        assert_eq!(spans.len(), 1, "expected exactly one span per request");
        let span = &spans[0];
        assert_eq!(span.parent_span_id, SpanId::INVALID);
        assert_ne!(
            span.span_context.trace_id(),
            TraceId::from_hex(UPSTREAM_TRACE_ID).unwrap()
        );
    }

    #[tokio::test]
    async fn request_with_upstream_context_continues_the_trace() {
        let spans = spans_for_request(Some(TRACEPARENT)).await;
        assert_eq!(spans.len(), 1, "continuation must not add a second root");
        let span = &spans[0];
        assert_eq!(
            span.span_context.trace_id(),
            TraceId::from_hex(UPSTREAM_TRACE_ID).unwrap()
        );
        assert_eq!(
            span.parent_span_id,
            SpanId::from_hex(UPSTREAM_SPAN_ID).unwrap()
        );
    }
}
