//! User domain types.
//!
//! [`User`] is what the store hands back; [`NewUser`] is the unvalidated
//! registration input, including the transient password confirmation.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use jungle_core::validation::{self, ValidationErrors};
use jungle_core::{Email, UserId};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A registered shopper.
///
/// The password hash is deliberately not part of this type; it only leaves
/// the repository when the authenticator asks for it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Normalized email address.
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration input.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    /// Raw email as typed; normalized on save.
    pub email: String,
    pub password: SecretString,
    /// Only checked when present.
    pub password_confirmation: Option<SecretString>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field(
                "password_confirmation",
                &self.password_confirmation.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl NewUser {
    /// Check every field rule and collect the failures.
    ///
    /// Email uniqueness needs the store and is checked by the authenticator
    /// once these rules pass.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        errors.require("first_name", Some(&self.first_name));
        errors.require("last_name", Some(&self.last_name));
        errors.require("email", Some(&self.email));

        let password = self.password.expose_secret();
        if validation::is_blank(Some(password)) {
            errors.add("password", validation::BLANK);
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("is too short (minimum is {MIN_PASSWORD_LENGTH} characters)"),
            );
        }

        if let Some(confirmation) = &self.password_confirmation
            && confirmation.expose_secret() != password
        {
            errors.add("password_confirmation", "doesn't match Password");
        }

        errors
    }
}
