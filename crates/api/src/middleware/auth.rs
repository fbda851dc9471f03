//! Authentication extractor.
//!
//! Routes that operate on per-user data take a [`CurrentUser`] argument,
//! which verifies the `Authorization: Bearer` token and yields the caller's
//! subject. Requests without a valid token are rejected with 401 before the
//! handler runs.

use axum::{extract::FromRequestParts, http::request::Parts};

use greenbasket_core::SubjectId;

use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a verified bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     CurrentUser(subject): CurrentUser,
///     State(state): State<AppState>,
/// ) -> Result<Json<CartView>> { ... }
/// ```
pub struct CurrentUser(pub SubjectId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let subject = state.verifier().verify(token).await?;

        // Associate any downstream errors with the caller
        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(subject.to_string()),
                ..Default::default()
            }));
        });

        Ok(Self(subject))
    }
}

/// Pull the token out of the `Authorization: Bearer` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
