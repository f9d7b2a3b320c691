//! Jungle Core - Shared types library.
//!
//! This crate provides common types used across all Jungle components:
//! - `storefront` - Public-facing shop (catalog, cart, accounts)
//! - `admin` - Basic-auth protected administration panel
//! - `cli` - Command-line tools for migrations, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation helpers - no I/O,
//! no database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and normalized emails
//! - [`validation`] - Field-keyed validation error lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{FieldError, ValidationErrors};
