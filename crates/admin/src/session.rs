//! Session middleware and the signed-in-admin extractor.
//!
//! The admin shell is single-operator: there are no admin accounts, just one
//! password checked against an Argon2 hash from the environment. A successful
//! login marks the session; the in-memory store means a restart signs the
//! operator out, which is acceptable for an internal tool.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::error::AdminError;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "gb_admin_session";

/// Session key marking a signed-in operator.
pub const SIGNED_IN_KEY: &str = "signed_in";

/// Session expiry time in seconds (8 hours).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(base_url: &str) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    let is_secure = base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor that requires a signed-in admin session.
///
/// Redirects to `/login` when the session is missing or not marked.
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminError::NotSignedIn)?;

        let signed_in: bool = session
            .get(SIGNED_IN_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or(false);

        if signed_in {
            Ok(Self)
        } else {
            Err(AdminError::NotSignedIn)
        }
    }
}
