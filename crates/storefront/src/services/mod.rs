//! Business logic services for storefront.
//!
//! - `auth` - Password registration and credential checks

pub mod auth;
