//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{CatalogRepository, UserRepository};
use crate::services::auth::Authenticator;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Catalog queries over the shared pool.
    #[must_use]
    pub fn catalog(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(&self.inner.pool)
    }

    /// Authenticator backed by the Postgres user table.
    #[must_use]
    pub fn authenticator(&self) -> Authenticator<UserRepository<'_>> {
        Authenticator::new(UserRepository::new(&self.inner.pool))
    }
}
