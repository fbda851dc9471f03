//! Integration tests for Greenbasket.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database, migrate and seed
//! docker compose up -d postgres
//! cargo run -p greenbasket-cli -- migrate
//! cargo run -p greenbasket-cli -- seed products
//!
//! # Start the API in dev-auth mode, then run the ignored tests
//! AUTH_DEV_SECRET=$GB_TEST_DEV_SECRET cargo run -p greenbasket-api &
//! cargo test -p greenbasket-integration-tests -- --ignored
//! ```
//!
//! The API must be started with `AUTH_DEV_SECRET` set to the same value the
//! tests use (`GB_TEST_DEV_SECRET`, default below), so the tests can mint
//! their own bearer tokens without a live identity provider.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

/// Default HS256 secret shared between the tests and a dev-mode API.
pub const DEFAULT_DEV_SECRET: &str = "greenbasket-integration-test-secret!!";

/// Default issuer shared between the tests and a dev-mode API.
pub const DEFAULT_ISSUER: &str = "https://auth.greenbasket.test";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[derive(Serialize)]
struct DevClaims<'a> {
    sub: &'a str,
    iss: String,
    exp: i64,
}

/// Mint a dev-mode bearer token for the given subject.
///
/// # Panics
///
/// Panics if token encoding fails; only reachable with a broken secret.
#[must_use]
pub fn dev_token(subject: &str) -> String {
    let secret =
        std::env::var("GB_TEST_DEV_SECRET").unwrap_or_else(|_| DEFAULT_DEV_SECRET.to_string());
    let issuer = std::env::var("AUTH_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

    let claims = DevClaims {
        sub: subject,
        iss: issuer,
        exp: Utc::now().timestamp() + 3600,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode dev token")
}

/// Build an HTTP client for talking to the API.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}
