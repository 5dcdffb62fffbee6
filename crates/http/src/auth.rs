//! Caller identity forwarded by the upstream gateway.

use axum::{extract::FromRequestParts, http::request::Parts};
use catalog_authz::Principal;
use catalog_kernel::settings::AuthSettings;

use crate::error::AppError;

/// Header names carrying the caller's identity, installed as a request extension
/// by [`crate::router::RouterBuilder::with_identity_headers`].
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub subject: String,
    pub roles: String,
}

impl From<&AuthSettings> for IdentityHeaders {
    fn from(settings: &AuthSettings) -> Self {
        Self {
            subject: settings.subject_header.to_ascii_lowercase(),
            roles: settings.roles_header.to_ascii_lowercase(),
        }
    }
}

impl Default for IdentityHeaders {
    fn default() -> Self {
        Self::from(&AuthSettings::default())
    }
}

/// Extractor resolving the authenticated [`Principal`] of a request.
///
/// Rejects with 401 when the subject header is absent or empty. A caller
/// without a roles header is authenticated but holds no roles.
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let names = parts
            .extensions
            .get::<IdentityHeaders>()
            .cloned()
            .unwrap_or_default();

        let subject = parts
            .headers
            .get(names.subject.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing caller identity"))?;

        let roles = parts
            .headers
            .get(names.roles.as_str())
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        Ok(Caller(Principal::from_role_list(subject, roles)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use catalog_authz::Role;

    async fn extract(request: Request<()>) -> Result<Caller, AppError> {
        let (mut parts, _) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn resolves_subject_and_roles() {
        let request = Request::builder()
            .header("x-user-id", "ana")
            .header("x-user-roles", "ROLE_LIBRARIAN")
            .body(())
            .unwrap();

        let Caller(principal) = extract(request).await.unwrap();
        assert_eq!(principal.subject, "ana");
        assert!(principal.has_role(Role::Librarian));
    }

    #[tokio::test]
    async fn missing_subject_is_unauthorized() {
        let request = Request::builder()
            .header("x-user-roles", "USER")
            .body(())
            .unwrap();

        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn honours_configured_header_names() {
        let mut request = Request::builder()
            .header("x-forwarded-user", "bo")
            .header("x-forwarded-groups", "USER")
            .body(())
            .unwrap();
        request.extensions_mut().insert(IdentityHeaders {
            subject: "x-forwarded-user".to_string(),
            roles: "x-forwarded-groups".to_string(),
        });

        let Caller(principal) = extract(request).await.unwrap();
        assert_eq!(principal.subject, "bo");
        assert!(principal.has_role(Role::User));
    }
}
