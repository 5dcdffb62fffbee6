use catalog_http::AppError;
use serde_json::json;
use thiserror::Error;

use super::models::BookId;

/// Failures of the catalog boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid book id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    #[error("book '{0}' not found")]
    NotFound(BookId),

    #[error("invalid search criterion: {reason}")]
    InvalidCriterion { reason: String },

    #[error("book store failure")]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn invalid_id(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_criterion(reason: impl Into<String>) -> Self {
        Self::InvalidCriterion {
            reason: reason.into(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidId { ref id, ref reason } => {
                let details = vec![json!({"field": "id", "value": id, "error": reason})];
                AppError::bad_request("invalid_id", err.to_string()).with_details(details)
            }
            CatalogError::NotFound(_) => AppError::not_found(err.to_string()),
            CatalogError::InvalidCriterion { ref reason } => {
                let details = vec![json!({"field": "criterion", "error": reason})];
                AppError::bad_request("invalid_criterion", err.to_string()).with_details(details)
            }
            CatalogError::Store(source) => {
                AppError::Internal(source.context("book store failure"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_http_statuses() {
        let id = BookId::parse("B9").unwrap();
        assert_eq!(
            AppError::from(CatalogError::NotFound(id)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CatalogError::invalid_criterion("empty")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(CatalogError::invalid_id("", "empty")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(CatalogError::Store(anyhow::anyhow!("disk"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_book() {
        let err = CatalogError::NotFound(BookId::parse("B9").unwrap());
        assert_eq!(err.to_string(), "book 'B9' not found");
    }
}
