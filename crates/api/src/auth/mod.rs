//! Bearer token verification against the hosted identity provider.
//!
//! The mobile client signs in through the provider's SDK and sends the
//! resulting JWT as `Authorization: Bearer <token>`. The backend verifies
//! the signature and standard claims, then trusts only the `sub` claim -
//! no user records are stored locally.
//!
//! Two verification modes:
//! - **Provider mode** (default): RS256 against the provider's JWKS,
//!   fetched from `{issuer}/.well-known/jwks.json` and cached in-process
//!   for `AUTH_JWKS_TTL_SECS`.
//! - **Dev mode** (`AUTH_DEV_SECRET` set): HS256 against a shared secret,
//!   for local development and tests.

use std::sync::Arc;

use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use greenbasket_core::{SubjectId, SubjectIdError};

use crate::config::AuthConfig;

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// The token failed signature or claim validation.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token's `kid` is not present in the provider's JWKS.
    #[error("unknown signing key: {0}")]
    UnknownKey(String),

    /// The provider's JWKS could not be fetched or parsed.
    #[error("jwks fetch failed: {0}")]
    JwksFetch(String),

    /// The verified `sub` claim is not a usable subject identifier.
    #[error("invalid subject: {0}")]
    InvalidSubject(#[from] SubjectIdError),
}

/// The claims the backend reads from a verified token.
///
/// `exp`, `iss` and `aud` are enforced by `jsonwebtoken::Validation`; only
/// the subject is carried forward.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
}

/// Verifies bearer tokens issued by the hosted identity provider.
///
/// Cheap to clone; the JWKS cache is shared.
#[derive(Clone)]
pub struct TokenVerifier {
    config: AuthConfig,
    http: reqwest::Client,
    jwks_cache: Cache<String, Arc<JwkSet>>,
}

impl TokenVerifier {
    /// Create a verifier from the auth configuration.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let jwks_cache = Cache::builder()
            .max_capacity(2)
            .time_to_live(config.jwks_ttl)
            .build();

        Self {
            config,
            http: reqwest::Client::new(),
            jwks_cache,
        }
    }

    /// Verify a bearer token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the token is malformed, signed by an unknown
    /// key, fails claim validation, or carries an unusable subject.
    pub async fn verify(&self, token: &str) -> Result<SubjectId, AuthError> {
        let claims = if let Some(secret) = &self.config.dev_secret {
            self.verify_hs256(token, secret.expose_secret())?
        } else {
            self.verify_rs256(token).await?
        };

        Ok(SubjectId::parse(&claims.sub)?)
    }

    /// Dev-mode verification against the shared secret.
    fn verify_hs256(&self, token: &str, secret: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let validation = self.validation(Algorithm::HS256);

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }

    /// Provider-mode verification against the cached JWKS.
    async fn verify_rs256(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token has no kid".to_string()))?;

        let jwks = self.jwks(false).await?;
        let jwk = match jwks.find(&kid) {
            Some(jwk) => jwk.clone(),
            // Key rotation: refetch once before giving up
            None => {
                let jwks = self.jwks(true).await?;
                jwks.find(&kid)
                    .cloned()
                    .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?
            }
        };

        let AlgorithmParameters::RSA(_) = &jwk.algorithm else {
            return Err(AuthError::UnknownKey(format!("{kid} is not an RSA key")));
        };

        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| AuthError::JwksFetch(format!("unusable jwk: {e}")))?;
        let validation = self.validation(Algorithm::RS256);

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }

    /// Claim validation rules shared by both modes.
    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.set_issuer(&[&self.config.issuer]);
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }

    /// Get the provider's JWKS, from cache unless `force_refresh`.
    async fn jwks(&self, force_refresh: bool) -> Result<Arc<JwkSet>, AuthError> {
        let url = self.config.jwks_url();
        if force_refresh {
            self.jwks_cache.invalidate(&url).await;
        }

        self.jwks_cache
            .try_get_with(url.clone(), async {
                let response = self
                    .http
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?
                    .error_for_status()
                    .map_err(|e| e.to_string())?;
                let jwks: JwkSet = response.json().await.map_err(|e| e.to_string())?;
                Ok::<_, String>(Arc::new(jwks))
            })
            .await
            .map_err(|e: Arc<String>| AuthError::JwksFetch(e.as_ref().clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    use jsonwebtoken::{EncodingKey, Header, encode};
    use secrecy::SecretString;
    use serde::Serialize;

    const DEV_SECRET: &str = "0123456789abcdef0123456789abcdef";
    const ISSUER: &str = "https://auth.greenbasket.test";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        iss: String,
        exp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        aud: Option<String>,
    }

    fn dev_config(issuer: &str) -> AuthConfig {
        AuthConfig {
            issuer: issuer.to_string(),
            audience: None,
            dev_secret: Some(SecretString::from(DEV_SECRET)),
            jwks_ttl: Duration::from_secs(60),
        }
    }

    fn mint(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp_in(secs: i64) -> i64 {
        chrono::Utc::now().timestamp() + secs
    }

    #[tokio::test]
    async fn test_verify_valid_dev_token() {
        let verifier = TokenVerifier::new(dev_config(ISSUER));
        let token = mint(
            &TestClaims {
                sub: "user_2aB3cD4eF5".to_string(),
                iss: ISSUER.to_string(),
                exp: exp_in(300),
                aud: None,
            },
            DEV_SECRET,
        );

        let subject = verifier.verify(&token).await.unwrap();
        assert_eq!(subject.as_str(), "user_2aB3cD4eF5");
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        let verifier = TokenVerifier::new(dev_config(ISSUER));
        let token = mint(
            &TestClaims {
                sub: "user_abc".to_string(),
                iss: ISSUER.to_string(),
                exp: exp_in(-600),
                aud: None,
            },
            DEV_SECRET,
        );

        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_issuer() {
        let verifier = TokenVerifier::new(dev_config(ISSUER));
        let token = mint(
            &TestClaims {
                sub: "user_abc".to_string(),
                iss: "https://evil.example.com".to_string(),
                exp: exp_in(300),
                aud: None,
            },
            DEV_SECRET,
        );

        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_signature() {
        let verifier = TokenVerifier::new(dev_config(ISSUER));
        let token = mint(
            &TestClaims {
                sub: "user_abc".to_string(),
                iss: ISSUER.to_string(),
                exp: exp_in(300),
                aud: None,
            },
            "another-secret-another-secret-..!",
        );

        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_enforces_audience_when_configured() {
        let mut config = dev_config(ISSUER);
        config.audience = Some("greenbasket-mobile".to_string());
        let verifier = TokenVerifier::new(config);

        let wrong_audience = mint(
            &TestClaims {
                sub: "user_abc".to_string(),
                iss: ISSUER.to_string(),
                exp: exp_in(300),
                aud: Some("someone-else".to_string()),
            },
            DEV_SECRET,
        );
        assert!(verifier.verify(&wrong_audience).await.is_err());

        let right_audience = mint(
            &TestClaims {
                sub: "user_abc".to_string(),
                iss: ISSUER.to_string(),
                exp: exp_in(300),
                aud: Some("greenbasket-mobile".to_string()),
            },
            DEV_SECRET,
        );
        assert!(verifier.verify(&right_audience).await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_mode_reports_unknown_kid() {
        let mut server = mockito::Server::new_async().await;

        // JWKS with a key the token was not signed with
        let jwks_mock = server
            .mock("GET", "/.well-known/jwks.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "keys": [{
                        "kty": "RSA",
                        "kid": "rotated-away",
                        "use": "sig",
                        "alg": "RS256",
                        "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
                        "e": "AQAB"
                    }]
                })
                .to_string(),
            )
            // First lookup + rotation refetch
            .expect(2)
            .create_async()
            .await;

        let config = AuthConfig {
            issuer: server.url(),
            audience: None,
            dev_secret: None,
            jwks_ttl: Duration::from_secs(60),
        };
        let verifier = TokenVerifier::new(config);

        // An RS256-shaped token with a kid the JWKS doesn't have. Signature
        // doesn't matter; key lookup fails first.
        let header = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6Im1pc3Npbmcta2lkIn0";
        let payload = "eyJzdWIiOiJ1c2VyX2FiYyJ9";
        let token = format!("{header}.{payload}.c2lnbmF0dXJl");

        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(AuthError::UnknownKey(kid)) if kid == "missing-kid"));
        jwks_mock.assert_async().await;
    }
}
