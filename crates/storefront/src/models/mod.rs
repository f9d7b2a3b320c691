//! Domain models for the storefront.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, LineItem};
pub use product::{Category, NewCategory, NewProduct, Product};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{MIN_PASSWORD_LENGTH, NewUser, User};
