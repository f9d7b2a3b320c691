//! Authentication service.
//!
//! Provides password registration and credential checks on top of a
//! [`UserStore`]. Emails are normalized before every lookup, and passwords are
//! only ever compared through argon2's verifier.

mod error;

pub use error::{AuthError, RegistrationError};

use std::future::Future;
use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;

use jungle_core::Email;
use jungle_core::validation::TAKEN;

use crate::db::RepositoryError;
use crate::db::users::NewUserRecord;
use crate::models::{NewUser, User};

/// Storage the authenticator needs.
///
/// Implemented by [`UserRepository`](crate::db::UserRepository) for Postgres.
pub trait UserStore {
    /// Look up a user and their password hash by normalized email.
    fn find_with_password_hash(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<(User, String)>, RepositoryError>> + Send;

    /// Whether the normalized email is already registered.
    fn email_taken(&self, email: &Email)
    -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Persist a new user. A duplicate email yields `RepositoryError::Conflict`.
    fn insert(
        &self,
        record: &NewUserRecord,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;
}

/// Hash verified when the email is unknown, so both paths cost one argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("jungle-timing-equalizer").ok());

/// Password authentication over a user store.
pub struct Authenticator<S> {
    store: S,
}

impl<S: UserStore> Authenticator<S> {
    /// Create an authenticator over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Check an email/password pair.
    ///
    /// The email is trimmed and lower-cased before lookup. Returns the user
    /// only when both the email and the password match; an unknown email and
    /// a wrong password are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store cannot be queried.
    pub async fn authenticate_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let found = match Email::normalize(email) {
            Ok(email) => self.store.find_with_password_hash(&email).await?,
            Err(_) => None,
        };

        let Some((user, hash)) = found else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Ok(None);
        };

        if verify_password(password, &hash) {
            tracing::debug!(user_id = %user.id, "credentials accepted");
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Validate, hash and store a new user.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::Invalid` with every failed field rule, or
    /// with `Email has already been taken` when the email is registered.
    /// Returns `RegistrationError::Auth` for storage or hashing failures.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, RegistrationError> {
        let mut errors = new_user.validate();

        let email = Email::normalize(&new_user.email).ok();
        if let Some(email) = &email
            && errors.is_empty()
            && self.store.email_taken(email).await?
        {
            errors.add("email", TAKEN);
        }

        let Some(email) = email.filter(|_| errors.is_empty()) else {
            return Err(RegistrationError::Invalid(errors));
        };

        let record = NewUserRecord {
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            email,
            password_hash: hash_password(new_user.password.expose_secret())?,
        };

        match self.store.insert(&record).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user registered");
                Ok(user)
            }
            // Lost a race with a concurrent registration
            Err(RepositoryError::Conflict(_)) => {
                errors.add("email", TAKEN);
                Err(RegistrationError::Invalid(errors))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash string.
///
/// An unparseable hash counts as a mismatch.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
