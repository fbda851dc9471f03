//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `AUTH_ISSUER` - Base URL of the hosted identity provider (JWT `iss`)
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 3000)
//! - `AUTH_AUDIENCE` - Expected JWT audience; skipped when unset
//! - `AUTH_DEV_SECRET` - HS256 shared secret for local development
//!   (min 32 chars; bypasses the provider's JWKS)
//! - `AUTH_JWKS_TTL_SECS` - JWKS cache lifetime (default: 3600)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_DEV_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Identity provider configuration
    pub auth: AuthConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Hosted identity provider configuration.
///
/// Implements `Debug` manually to redact the dev secret.
#[derive(Clone)]
pub struct AuthConfig {
    /// Issuer base URL; bearer tokens must carry this `iss` claim.
    /// The provider's JWKS is fetched from `{issuer}/.well-known/jwks.json`.
    pub issuer: String,
    /// Expected `aud` claim; audience validation is skipped when `None`.
    pub audience: Option<String>,
    /// HS256 shared secret for local development. When set, tokens are
    /// verified against this secret instead of the provider's JWKS.
    pub dev_secret: Option<SecretString>,
    /// How long a fetched JWKS document is reused before re-fetching.
    pub jwks_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field(
                "dev_secret",
                &self.dev_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("jwks_ttl", &self.jwks_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("API_DATABASE_URL")?;
        let host = get_env_or_default("API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("API_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_PORT".to_string(), e.to_string()))?;

        let auth = AuthConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            auth,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let issuer = get_required_env("AUTH_ISSUER")?;
        url::Url::parse(&issuer)
            .map_err(|e| ConfigError::InvalidEnvVar("AUTH_ISSUER".to_string(), e.to_string()))?;

        let dev_secret = match get_optional_env("AUTH_DEV_SECRET") {
            Some(value) => {
                validate_dev_secret(&value, "AUTH_DEV_SECRET")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        let jwks_ttl_secs = get_env_or_default("AUTH_JWKS_TTL_SECS", "3600")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("AUTH_JWKS_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            issuer: issuer.trim_end_matches('/').to_string(),
            audience: get_optional_env("AUTH_AUDIENCE"),
            dev_secret,
            jwks_ttl: Duration::from_secs(jwks_ttl_secs),
        })
    }

    /// URL of the provider's JWKS document.
    #[must_use]
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by managed
/// Postgres attach flows).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the HS256 dev secret meets minimum length requirements.
fn validate_dev_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_DEV_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_DEV_SECRET_LENGTH,
                secret.len()
            ),
        ));
    }
    Ok(())
}
