//! Authentication error types.

use thiserror::Error;

use jungle_core::ValidationErrors;

use crate::db::RepositoryError;

/// Infrastructure failures during authentication.
///
/// Wrong credentials are not an error; they yield `Ok(None)`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Errors that can occur while registering a user.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// One or more field rules failed; nothing was stored.
    #[error("invalid registration: {0}")]
    Invalid(ValidationErrors),

    /// Storage or hashing failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<RepositoryError> for RegistrationError {
    fn from(err: RepositoryError) -> Self {
        Self::Auth(AuthError::Repository(err))
    }
}
