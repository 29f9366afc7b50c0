//! [`BookStore`]: thread-safe in-memory store for the book catalogue.
//!
//! Persistence correctness is not a concern of this service; the store is
//! request/response glue that gives the instrumented CRUD surface something
//! to act on. Identifiers are assigned monotonically for the process lifetime.

use std::collections::HashMap;
use std::sync::Arc;

use common::protocol::{Book, UpdateBookRequest};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    books: HashMap<u64, Book>,
    next_id: u64,
}

/// Thread-safe store for the book catalogue.
///
/// Wraps an `Arc<RwLock<..>>` so that many concurrent read-lock holders
/// (list/get handlers) can access the catalogue simultaneously while write
/// operations swap entries atomically.
#[derive(Clone, Debug, Default)]
pub struct BookStore {
    inner: Arc<RwLock<Inner>>,
}

impl BookStore {
    /// Create a new, empty [`BookStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// All books, ordered by id.
    pub async fn list(&self) -> Vec<Book> {
        let lock = self.inner.read().await;
        let mut books: Vec<Book> = lock.books.values().cloned().collect();
        books.sort_by_key(|b| b.id);
        books
    }

    /// Look up a single book.
    pub async fn get(&self, id: u64) -> Option<Book> {
        self.inner.read().await.books.get(&id).cloned()
    }

    /// Insert a new book and return it with its assigned id.
    pub async fn create(&self, title: String, author: String) -> Book {
        let mut lock = self.inner.write().await;
        lock.next_id += 1;
        let book = Book {
            id: lock.next_id,
            title,
            author,
        };
        lock.books.insert(book.id, book.clone());
        book
    }

    /// Apply a partial update, returning the new state or `None` if absent.
    pub async fn update(&self, id: u64, update: UpdateBookRequest) -> Option<Book> {
        let mut lock = self.inner.write().await;
        let book = lock.books.get_mut(&id)?;
        if let Some(title) = update.title {
            book.title = title;
        }
        if let Some(author) = update.author {
            book.author = author;
        }
        Some(book.clone())
    }

    /// Remove a book; `true` if it existed.
    pub async fn delete(&self, id: u64) -> bool {
        self.inner.write().await.books.remove(&id).is_some()
    }

    /// Number of books currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.books.len()
    }

    /// Whether the catalogue is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initially_empty() {
        let store = BookStore::new();
        assert!(store.is_empty().await);
        assert!(store.get(1).await.is_none());
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = BookStore::new();
        let a = store.create("Dune".into(), "Frank Herbert".into()).await;
        let b = store.create("Hyperion".into(), "Dan Simmons".into()).await;
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = BookStore::new();
        store.create("B".into(), "x".into()).await;
        store.create("A".into(), "y".into()).await;
        let books = store.list().await;
        assert_eq!(books.len(), 2);
        assert!(books[0].id < books[1].id);
    }

    #[tokio::test]
    async fn update_applies_partial_fields() {
        let store = BookStore::new();
        let book = store.create("Dune".into(), "F. Herbert".into()).await;
        let updated = store
            .update(
                book.id,
                UpdateBookRequest {
                    author: Some("Frank Herbert".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Dune");
        assert_eq!(updated.author, "Frank Herbert");
    }

    #[tokio::test]
    async fn update_missing_book_returns_none() {
        let store = BookStore::new();
        let result = store.update(42, UpdateBookRequest::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_removes_book() {
        let store = BookStore::new();
        let book = store.create("Dune".into(), "Frank Herbert".into()).await;
        assert!(store.delete(book.id).await);
        assert!(!store.delete(book.id).await);
        assert!(store.is_empty().await);
    }
}
