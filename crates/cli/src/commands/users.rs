//! Shopper account management.
//!
//! # Usage
//!
//! ```bash
//! JUNGLE_USER_PASSWORD=... jungle-cli users create -f Kyle -l Doe -e kyle@example.com
//! ```
//!
//! The password is read from `JUNGLE_USER_PASSWORD` so it never shows up in
//! shell history or process listings. Registration goes through the same
//! validation and hashing as the storefront sign-up form.

use secrecy::SecretString;
use tracing::{error, info};

use jungle_core::UserId;
use jungle_storefront::db::UserRepository;
use jungle_storefront::models::NewUser;
use jungle_storefront::services::auth::Authenticator;

use super::{CliError, connect};

const PASSWORD_VAR: &str = "JUNGLE_USER_PASSWORD";

/// Register a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `CliError::MissingEnvVar` if no password is set,
/// `CliError::Invalid` if a field rule fails or the email is taken, and a
/// database error if the insert fails.
pub async fn create(
    first_name: String,
    last_name: String,
    email: String,
) -> Result<UserId, CliError> {
    dotenvy::dotenv().ok();

    let password = std::env::var(PASSWORD_VAR)
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar(PASSWORD_VAR))?;

    let new_user = NewUser {
        first_name,
        last_name,
        email,
        password,
        password_confirmation: None,
    };

    // Fail fast on field rules before connecting
    let errors = new_user.validate();
    if !errors.is_empty() {
        for message in errors.full_messages() {
            error!("  - {message}");
        }
        return Err(CliError::Invalid(errors));
    }

    let pool = connect().await?;
    let user = Authenticator::new(UserRepository::new(&pool))
        .register(&new_user)
        .await?;

    info!(
        "User created successfully! ID: {}, Email: {}, Name: {}",
        user.id,
        user.email.as_str(),
        user.full_name()
    );

    Ok(user.id)
}
