//! Subject identifier issued by the hosted identity provider.
//!
//! Greenbasket delegates user identity entirely to the external auth
//! provider. The backend never stores user records; carts, wishlists,
//! addresses and orders carry the provider's subject string as their owner
//! reference.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted subject length. Provider subjects are short opaque
/// strings; anything longer is rejected as malformed input.
const MAX_SUBJECT_LENGTH: usize = 255;

/// Error validating a subject identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubjectIdError {
    #[error("subject must not be empty")]
    Empty,
    #[error("subject exceeds {MAX_SUBJECT_LENGTH} characters")]
    TooLong,
    #[error("subject contains whitespace or control characters")]
    InvalidCharacters,
}

/// The owner reference for user-scoped entities.
///
/// Wraps the `sub` claim of a verified bearer token. Construct via
/// [`SubjectId::parse`] so malformed values never reach the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Parse and validate a subject string.
    ///
    /// # Errors
    ///
    /// Returns `SubjectIdError` if the value is empty, too long, or contains
    /// whitespace/control characters.
    pub fn parse(value: &str) -> Result<Self, SubjectIdError> {
        if value.is_empty() {
            return Err(SubjectIdError::Empty);
        }
        if value.len() > MAX_SUBJECT_LENGTH {
            return Err(SubjectIdError::TooLong);
        }
        if value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(SubjectIdError::InvalidCharacters);
        }
        Ok(Self(value.to_owned()))
    }

    /// Get the subject as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for SubjectId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SubjectId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(raw))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for SubjectId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let subject = SubjectId::parse("user_2aB3cD4eF5").unwrap();
        assert_eq!(subject.as_str(), "user_2aB3cD4eF5");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SubjectId::parse(""), Err(SubjectIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(256);
        assert_eq!(SubjectId::parse(&long), Err(SubjectIdError::TooLong));
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert_eq!(
            SubjectId::parse("user 123"),
            Err(SubjectIdError::InvalidCharacters)
        );
        assert_eq!(
            SubjectId::parse("user\n123"),
            Err(SubjectIdError::InvalidCharacters)
        );
    }

    #[test]
    fn test_serde_transparent() {
        let subject = SubjectId::parse("user_abc").unwrap();
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, "\"user_abc\"");
    }
}
