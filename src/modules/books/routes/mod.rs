//! HTTP surface of the catalog. Every handler runs the policy check for its
//! operation before the service is touched.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    Json,
};
use catalog_authz::{Policy, Role};
use catalog_http::{AppError, Caller};
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

use super::models::Book;
use super::service::CatalogService;

pub const GET_BOOK: &str = "books.get";
pub const CHECK_AVAILABILITY: &str = "books.available";
pub const SET_AVAILABILITY: &str = "books.set_availability";
pub const SEARCH_BOOKS: &str = "books.search";

/// Shared state handed to every catalog handler.
#[derive(Clone)]
pub struct CatalogState {
    pub service: CatalogService,
    pub policy: Arc<Policy>,
}

/// Librarians and users may read; only librarians change availability.
pub fn catalog_policy() -> Policy {
    let readers = [Role::Librarian, Role::User];
    Policy::new()
        .allow(GET_BOOK, readers)
        .allow(CHECK_AVAILABILITY, readers)
        .allow(SEARCH_BOOKS, readers)
        .allow(SET_AVAILABILITY, [Role::Librarian])
}

/// Catalog routes together with their OpenAPI description.
pub fn router(state: CatalogState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(search_books))
        .routes(routes!(get_book))
        .routes(routes!(is_available))
        .routes(routes!(set_availability))
        .with_state(state)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text criterion matched against title, author, and id
    criterion: Option<String>,
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Books",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 400, description = "Malformed book identifier"),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller lacks a required role"),
        (status = 404, description = "Book not found")
    )
)]
async fn get_book(
    State(state): State<CatalogState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    state.policy.authorize(GET_BOOK, &principal)?;
    let book = state.service.get_book(&id).await?;
    Ok(Json(book))
}

/// Check whether a book is available
///
/// Unknown ids report `false`.
#[utoipa::path(
    get,
    path = "/{id}/available",
    tag = "Books",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Availability of the book; false when the book does not exist", body = bool),
        (status = 400, description = "Malformed book identifier"),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller lacks a required role")
    )
)]
async fn is_available(
    State(state): State<CatalogState>,
    Caller(principal): Caller,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    state.policy.authorize(CHECK_AVAILABILITY, &principal)?;
    let available = state.service.is_available(&id).await?;
    Ok(Json(available))
}

/// Update the availability of a book
#[utoipa::path(
    put,
    path = "/{id}/availability",
    tag = "Books",
    params(("id" = String, Path, description = "Book identifier")),
    request_body(content = bool, description = "New availability flag"),
    responses(
        (status = 200, description = "Availability updated"),
        (status = 400, description = "Malformed book identifier or body"),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller lacks the LIBRARIAN role"),
        (status = 404, description = "Book not found")
    )
)]
async fn set_availability(
    State(state): State<CatalogState>,
    Caller(principal): Caller,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<bool>, JsonRejection>,
) -> Result<(), AppError> {
    // Role check comes before the path and body are looked at.
    state.policy.authorize(SET_AVAILABILITY, &principal)?;
    let Path(id) = path?;
    let Json(available) = body?;
    state.service.set_availability(&id, available).await?;
    Ok(())
}

/// Search books by criterion
#[utoipa::path(
    get,
    path = "/search",
    tag = "Books",
    params(SearchParams),
    responses(
        (status = 200, description = "Books matching the criterion", body = Vec<Book>),
        (status = 400, description = "Missing, empty, or malformed criterion"),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller lacks a required role")
    )
)]
async fn search_books(
    State(state): State<CatalogState>,
    Caller(principal): Caller,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    state.policy.authorize(SEARCH_BOOKS, &principal)?;
    let books = state
        .service
        .search(params.criterion.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(books))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_gates_mutation_to_librarians() {
        let policy = catalog_policy();
        let user = catalog_authz::Principal::new("u1", [Role::User]);

        for operation in [GET_BOOK, CHECK_AVAILABILITY, SEARCH_BOOKS] {
            assert!(policy.authorize(operation, &user).is_ok(), "{operation}");
        }
        assert!(policy.authorize(SET_AVAILABILITY, &user).is_err());
        assert_eq!(
            policy.required_roles(SET_AVAILABILITY).unwrap().len(),
            1
        );
    }
}
