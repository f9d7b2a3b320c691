//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (no auth)
//! GET  /health/ready           - Readiness check (no auth)
//!
//! # Dashboard
//! GET  /                       - Product and category counts
//!
//! # Products
//! GET  /products               - Product table
//! GET  /products/new           - New product form
//! POST /products               - Create product
//!
//! # Categories
//! GET  /categories             - Category table with new category form
//! POST /categories             - Create category
//! ```

pub mod categories;
pub mod dashboard;
pub mod products;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(categories::index).post(categories::create))
}

/// Routes behind Basic auth.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
}

/// Health routes, reachable without credentials.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
