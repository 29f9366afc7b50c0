//! Request and response types exchanged over the book CRUD API.
//!
//! All bodies are serialised as JSON.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Book entity
// ---------------------------------------------------------------------------

/// A catalogued book as returned by every read endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, unique for the process lifetime.
    pub id: u64,
    pub title: String,
    pub author: String,
}

/// Request body for `POST /books`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
}

/// Request body for `PATCH /books/:id`.
///
/// Absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Response body for `DELETE /books/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookResponse {
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status; always `"ok"` once the listener is up.
    pub status: String,
    /// Number of books currently stored.
    pub books: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_round_trip() {
        let book = Book {
            id: 1,
            title: "The Mythical Man-Month".into(),
            author: "Fred Brooks".into(),
        };
        let json = serde_json::to_string(&book).unwrap();
        let decoded: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, book);
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let req: UpdateBookRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none());
        assert!(req.author.is_none());
    }

    #[test]
    fn update_request_skips_absent_fields_on_serialise() {
        let req = UpdateBookRequest {
            title: Some("Updated".into()),
            author: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("title"));
        assert!(!json.contains("author"));
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("not_found", "book 42 does not exist");
        assert_eq!(e.code, "not_found");
        assert!(e.message.contains("42"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            books: 3,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.books, 3);
    }
}
