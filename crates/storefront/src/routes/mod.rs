//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Product listing (home)
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//! GET  /categories/{id}        - Products of one category
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (fragment for HTMX, redirect otherwise)
//! POST /cart/update            - Set a line quantity
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart count indicator (fragment)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::current_user;
use crate::state::AppState;

/// Navigation data every full page needs.
#[derive(Debug, Clone, Default)]
pub struct NavContext {
    /// Sum of quantities in the session cart.
    pub cart_count: u64,
    /// First name of the logged-in user.
    pub first_name: Option<String>,
}

impl NavContext {
    /// Read the cart and user from the session.
    pub async fn from_session(session: &Session) -> Self {
        Self {
            cart_count: cart::load_cart(session).await.count(),
            first_name: current_user(session).await.map(|u| u.first_name),
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(categories::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
}
