//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all CRUD routes and shared middleware.
//! - Attach the request instrumentation middleware (span per request,
//!   context propagation, HTTP metrics).
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
