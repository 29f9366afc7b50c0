//! `book-catalog-svc` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (OTLP traces, logs, metrics + tracing).
//! 3. Build the Axum router with the instrumentation middleware and start the
//!    HTTP server.
//! 4. On SIGINT/SIGTERM, drain the server, then flush and close the signal
//!    providers in order (metrics, traces, logs).

mod config;
mod server;
mod store;
mod telemetry;

use anyhow::Result;
use tracing::info;

use config::Config;
use server::state::AppState;
use store::BookStore;
use telemetry::TransportConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    let transport = TransportConfig::new(&cfg.otel_exporter_otlp_endpoint, &cfg.insecure_mode);
    let telemetry = telemetry::init(&cfg.service_name, transport.clone(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        service_name = %cfg.service_name,
        endpoint = %transport.endpoint,
        insecure = transport.security.is_insecure(),
        "book-catalog-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(BookStore::new(), telemetry.http_metrics.clone());
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.http_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // -----------------------------------------------------------------------
    // 4. Telemetry teardown
    // -----------------------------------------------------------------------
    info!("server drained; flushing telemetry");
    let mut guard = telemetry.guard;
    guard.shutdown(telemetry::SHUTDOWN_DEADLINE).await;

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
