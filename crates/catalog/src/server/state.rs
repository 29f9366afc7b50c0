//! Shared application state injected into every Axum handler.

use crate::store::BookStore;
use crate::telemetry::HttpMetrics;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe in-memory book catalogue.
    pub store: BookStore,
    /// HTTP instruments; `None` when the metric pipeline failed to start.
    pub metrics: Option<HttpMetrics>,
}

impl AppState {
    /// Create a new [`AppState`] with the provided store and instruments.
    pub fn new(store: BookStore, metrics: Option<HttpMetrics>) -> Self {
        Self { store, metrics }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with an empty store and no metrics,
    /// suitable for tests.
    fn default() -> Self {
        Self::new(BookStore::new(), None)
    }
}
