//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (shared with the storefront)
//! 4. Security headers (shared with the storefront)
//! 5. Basic auth guard (every route except health checks)

pub mod basic_auth;

pub use basic_auth::{CHALLENGE, require_basic_auth};
