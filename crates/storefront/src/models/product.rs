//! Catalog domain types: categories and the products they own.

use chrono::{DateTime, Utc};
use serde::Serialize;

use jungle_core::validation::ValidationErrors;
use jungle_core::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    /// Image URL or path, rendered as-is.
    pub image: Option<String>,
    #[sqlx(rename = "price_cents")]
    pub price: Price,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether no stock is left.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.quantity <= 0
    }

    /// Description, or an empty string.
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Unvalidated product input.
///
/// Required values are `Option`s so a missing one can be reported instead of
/// rejected by the form decoder.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Price>,
    pub quantity: Option<i32>,
    pub category_id: Option<CategoryId>,
}

impl NewProduct {
    /// Check field presence and the quantity range.
    ///
    /// Whether `category_id` refers to an existing row is checked by the
    /// catalog repository on insert.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        errors.require("name", self.name.as_deref());
        errors.require_some("price", self.price.as_ref());
        if errors.require_some("quantity", self.quantity.as_ref())
            && self.quantity.is_some_and(|q| q < 0)
        {
            errors.add("quantity", "must be greater than or equal to 0");
        }
        errors.require_some("category", self.category_id.as_ref());

        errors
    }
}

/// Unvalidated category input.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    /// Check that a name is present. Uniqueness is enforced on insert.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("name", Some(&self.name));
        errors
    }
}
