//! User repository for database operations.
//!
//! Emails are always bound in their normalized form, so lookups by the unique
//! `email` column behave case-insensitively.

use sqlx::PgPool;

use jungle_core::Email;

use super::RepositoryError;
use crate::models::User;
use crate::services::auth::UserStore;

const USER_COLUMNS: &str = "id, first_name, last_name, email, created_at, updated_at";

/// A user ready to be inserted: validated, normalized and hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: String,
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM storefront.user WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Whether a user with this email exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storefront.user WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, record: &NewUserRecord) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO storefront.user (first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(record.first_name.trim())
        .bind(record.last_name.trim())
        .bind(&record.email)
        .bind(&record.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email"))
    }
}

impl UserStore for UserRepository<'_> {
    async fn find_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.get_with_password_hash(email).await
    }

    async fn email_taken(&self, email: &Email) -> Result<bool, RepositoryError> {
        self.email_exists(email).await
    }

    async fn insert(&self, record: &NewUserRecord) -> Result<User, RepositoryError> {
        self.create(record).await
    }
}
