use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::CatalogError;

const MAX_ID_LEN: usize = 64;
const MAX_CRITERION_LEN: usize = 128;

/// Opaque identifier of a catalog entry.
///
/// Always well-formed: non-empty, at most 64 characters, no whitespace or
/// control characters. Build it through [`BookId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "B1")]
pub struct BookId(String);

impl BookId {
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        if raw.is_empty() {
            return Err(CatalogError::invalid_id(raw, "identifier must not be empty"));
        }
        if raw.chars().count() > MAX_ID_LEN {
            return Err(CatalogError::invalid_id(
                raw,
                format!("identifier exceeds {} characters", MAX_ID_LEN),
            ));
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CatalogError::invalid_id(
                raw,
                "identifier must not contain whitespace or control characters",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        BookId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Identifier of the book; never changes after creation
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Whether the book may currently be borrowed
    pub available: bool,
}

impl Book {
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        available: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            available,
        }
    }
}

/// Validated free-text search input, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion(String);

impl Criterion {
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::invalid_criterion("criterion must not be empty"));
        }
        if trimmed.chars().count() > MAX_CRITERION_LEN {
            return Err(CatalogError::invalid_criterion(format!(
                "criterion exceeds {} characters",
                MAX_CRITERION_LEN
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(CatalogError::invalid_criterion(
                "criterion must not contain control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_id_equality_is_by_value() {
        assert_eq!(BookId::parse("B1").unwrap(), BookId::parse("B1").unwrap());
        assert_ne!(BookId::parse("B1").unwrap(), BookId::parse("b1").unwrap());
    }

    #[test]
    fn book_id_rejects_malformed_input() {
        assert!(matches!(BookId::parse(""), Err(CatalogError::InvalidId { .. })));
        assert!(matches!(BookId::parse("B 1"), Err(CatalogError::InvalidId { .. })));
        assert!(matches!(BookId::parse("B1\n"), Err(CatalogError::InvalidId { .. })));
        assert!(BookId::parse(&"x".repeat(65)).is_err());
        assert!(BookId::parse(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn book_serializes_with_flat_id() {
        let book = Book::new(BookId::parse("B1").unwrap(), "Dune", "Frank Herbert", false);
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "B1",
                "title": "Dune",
                "author": "Frank Herbert",
                "available": false
            })
        );
    }

    #[test]
    fn deserializing_rejects_bad_id() {
        let result: Result<Book, _> = serde_json::from_value(serde_json::json!({
            "id": "",
            "title": "Dune",
            "author": "Frank Herbert",
            "available": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn criterion_is_trimmed() {
        assert_eq!(Criterion::parse("  rust ").unwrap().as_str(), "rust");
    }

    #[test]
    fn criterion_rejects_empty_and_malformed() {
        for raw in ["", "   ", "ab\u{0007}c"] {
            assert!(matches!(
                Criterion::parse(raw),
                Err(CatalogError::InvalidCriterion { .. })
            ));
        }
        assert!(Criterion::parse(&"q".repeat(129)).is_err());
    }
}
