use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Book, BookId, Criterion};

/// Storage collaborator behind the catalog boundary.
///
/// Implementations own matching semantics for [`BookStore::search`] and
/// serialize concurrent writes to the same book.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Look up a book by identifier.
    async fn find(&self, id: &BookId) -> anyhow::Result<Option<Book>>;

    /// Set the availability flag. Returns `false` when no book has that id.
    async fn set_availability(&self, id: &BookId, available: bool) -> anyhow::Result<bool>;

    /// All books matching the criterion.
    async fn search(&self, criterion: &Criterion) -> anyhow::Result<Vec<Book>>;

    /// Insert or replace a book.
    async fn insert(&self, book: Book) -> anyhow::Result<()>;

    async fn len(&self) -> anyhow::Result<usize>;
}

/// Process-local store keyed by id.
///
/// Search is a case-insensitive substring match on title, author, or id;
/// results come back ordered by id.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    books: RwLock<BTreeMap<BookId, Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books
            .into_iter()
            .map(|book| (book.id.clone(), book))
            .collect();
        Self {
            books: RwLock::new(books),
        }
    }
}

fn book_matches(book: &Book, needle: &str) -> bool {
    [book.title.as_str(), book.author.as_str(), book.id.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find(&self, id: &BookId) -> anyhow::Result<Option<Book>> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn set_availability(&self, id: &BookId, available: bool) -> anyhow::Result<bool> {
        let mut books = self.books.write().await;
        match books.get_mut(id) {
            Some(book) => {
                book.available = available;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search(&self, criterion: &Criterion) -> anyhow::Result<Vec<Book>> {
        let needle = criterion.as_str().to_lowercase();
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| book_matches(book, &needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, book: Book) -> anyhow::Result<()> {
        self.books.write().await.insert(book.id.clone(), book);
        Ok(())
    }

    async fn len(&self) -> anyhow::Result<usize> {
        Ok(self.books.read().await.len())
    }
}
