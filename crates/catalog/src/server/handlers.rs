//! Axum request handlers for the book CRUD surface.
//!
//! Handlers run inside the request span started by the instrumentation
//! middleware, so any `tracing` event they emit carries trace/span
//! correlation ids into the exported log records.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    Book, CreateBookRequest, DeleteBookResponse, ErrorResponse, HealthResponse, UpdateBookRequest,
};
use common::ServiceError;
use tracing::info;

use super::state::AppState;

/// Render a [`ServiceError`] as its JSON error body and mapped status code.
fn error_response(err: &ServiceError) -> Response {
    let status = StatusCode::from_u16(err.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}

fn book_not_found(id: u64) -> Response {
    error_response(&ServiceError::NotFound(id))
}

/// `GET /books` — list all books.
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.store.list().await)
}

/// `GET /books/:id` — fetch a single book.
pub async fn get_book(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    match state.store.get(id).await {
        Some(book) => (StatusCode::OK, Json(book)).into_response(),
        None => book_not_found(id),
    }
}

/// `POST /books` — create a book.
///
/// Title and author must be non-empty; everything else about the entity is
/// deliberately unvalidated glue.
pub async fn create_book(
    State(state): State<AppState>,
    Json(req): Json<CreateBookRequest>,
) -> Response {
    if req.title.trim().is_empty() || req.author.trim().is_empty() {
        return error_response(&ServiceError::BadRequest(
            "title and author must be non-empty".into(),
        ));
    }
    let book = state.store.create(req.title, req.author).await;
    info!(book.id, "book created");
    (StatusCode::CREATED, Json(book)).into_response()
}

/// `PATCH /books/:id` — partially update a book.
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateBookRequest>,
) -> Response {
    match state.store.update(id, req).await {
        Some(book) => (StatusCode::OK, Json(book)).into_response(),
        None => book_not_found(id),
    }
}

/// `DELETE /books/:id` — remove a book.
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    if state.store.delete(id).await {
        info!(book.id = id, "book deleted");
        (StatusCode::OK, Json(DeleteBookResponse { deleted: true })).into_response()
    } else {
        book_not_found(id)
    }
}

/// `GET /health` — liveness check; reports the catalogue size.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        books: state.store.len().await,
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
