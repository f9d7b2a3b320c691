//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod users;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use jungle_core::ValidationErrors;
use jungle_storefront::db::catalog::CatalogWriteError;
use jungle_storefront::db::{self, RepositoryError};
use jungle_storefront::services::auth::{AuthError, RegistrationError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Input failed field validation.
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    /// Seed catalog file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Seed catalog is not valid YAML for the expected shape.
    #[error("Invalid catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Seed catalog parsed but holds invalid entries.
    #[error("{0} catalog errors found")]
    Catalog(usize),
}

impl From<CatalogWriteError> for CliError {
    fn from(err: CatalogWriteError) -> Self {
        match err {
            CatalogWriteError::Invalid(errors) => Self::Invalid(errors),
            CatalogWriteError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<RegistrationError> for CliError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Invalid(errors) => Self::Invalid(errors),
            RegistrationError::Auth(e) => Self::Auth(e),
        }
    }
}

/// Connect to the storefront database named by the environment.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&database_url).await?)
}
