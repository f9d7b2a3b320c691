//! Normalized email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when normalizing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be blank")]
    Blank,
}

/// A normalized email address.
///
/// Emails are compared and stored in their normalized form: surrounding
/// whitespace is trimmed and the whole address is lower-cased. Two inputs that
/// differ only by case or surrounding whitespace therefore produce equal
/// `Email` values, which makes the address usable as a lookup key.
///
/// No structural check (presence of `@`, domain shape) is performed; account
/// validation only requires an email to be present.
///
/// ## Examples
///
/// ```
/// use jungle_core::Email;
///
/// let a = Email::normalize("  Kyle.Liang@Example.com ").unwrap();
/// let b = Email::normalize("KYLE.LIANG@EXAMPLE.COM").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "kyle.liang@example.com");
///
/// assert!(Email::normalize("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize raw user input into an `Email`.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Blank`] if the input is empty after trimming.
    pub fn normalize(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Blank);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Stored emails are written normalized; re-normalizing is a no-op for them
        Ok(Self::normalize(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
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
    fn test_normalize_trims_and_lowercases() {
        let email = Email::normalize("  Kyle.Liang@Example.com  ").unwrap();
        assert_eq!(email.as_str(), "kyle.liang@example.com");
    }

    #[test]
    fn test_variants_are_equal() {
        let base = Email::normalize("kyle.liang@example.com").unwrap();
        for variant in [
            "KYLE.LIANG@EXAMPLE.COM",
            "kyLe.LiANg@examPLe.com",
            "\tkyle.liang@example.com\n",
            "   kyle.liang@example.com",
        ] {
            assert_eq!(Email::normalize(variant).unwrap(), base, "{variant:?}");
        }
    }

    #[test]
    fn test_blank_is_rejected() {
        assert_eq!(Email::normalize(""), Err(EmailError::Blank));
        assert_eq!(Email::normalize(" \t "), Err(EmailError::Blank));
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        // Only surrounding whitespace is part of normalization
        let email = Email::normalize(" a b@c ").unwrap();
        assert_eq!(email.as_str(), "a b@c");
    }

    #[test]
    fn test_display() {
        let email = Email::normalize("User@Example.com").unwrap();
        assert_eq!(format!("{email}"), "user@example.com");
    }

    #[test]
    fn test_from_str() {
        let email: Email = " USER@example.com".parse().unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_serde_is_transparent() {
        let email = Email::normalize("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");
    }
}
