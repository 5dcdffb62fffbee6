use std::sync::Arc;

use super::error::CatalogError;
use super::models::{Book, BookId, Criterion};
use super::store::BookStore;

/// Catalog boundary: validates input shape and delegates to the store.
///
/// Holds no state of its own; every call is an independent exchange.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Fetch a book, or `NotFound` when no book has that id.
    pub async fn get_book(&self, id: &str) -> Result<Book, CatalogError> {
        let id = BookId::parse(id)?;
        tracing::debug!(book_id = %id, "looking up book");

        let book = self.store.find(&id).await?;
        book.ok_or(CatalogError::NotFound(id))
    }

    /// Availability of a book.
    ///
    /// An unknown id reads as unavailable rather than `NotFound`, so callers
    /// cannot tell "missing" from "checked out" here. Use [`Self::get_book`]
    /// when the distinction matters.
    pub async fn is_available(&self, id: &str) -> Result<bool, CatalogError> {
        match self.get_book(id).await {
            Ok(book) => Ok(book.available),
            Err(CatalogError::NotFound(id)) => {
                tracing::debug!(book_id = %id, "availability of unknown book reported as false");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Update the availability flag of exactly one existing book.
    pub async fn set_availability(&self, id: &str, available: bool) -> Result<(), CatalogError> {
        let id = BookId::parse(id)?;

        if !self.store.set_availability(&id, available).await? {
            return Err(CatalogError::NotFound(id));
        }

        tracing::info!(book_id = %id, available, "book availability updated");
        Ok(())
    }

    /// Books matching a free-text criterion; possibly empty.
    pub async fn search(&self, criterion: &str) -> Result<Vec<Book>, CatalogError> {
        let criterion = Criterion::parse(criterion)?;
        let books = self.store.search(&criterion).await?;

        tracing::debug!(%criterion, hits = books.len(), "catalog search");
        Ok(books)
    }
}
