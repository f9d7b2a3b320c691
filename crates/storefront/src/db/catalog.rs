//! Catalog repository: categories, products and dashboard counts.

use sqlx::PgPool;

use jungle_core::validation::{BLANK, TAKEN, ValidationErrors};
use jungle_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::{Category, NewCategory, NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, category_id, name, description, image, price_cents, quantity, \
                               created_at, updated_at";

/// Why a catalog insert was refused.
#[derive(Debug, thiserror::Error)]
pub enum CatalogWriteError {
    /// Field rules failed; nothing was written.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A category with the number of products it owns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategorySummary {
    #[sqlx(flatten)]
    pub category: Category,
    pub product_count: i64,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// One product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Products matching any of `ids`, ordered by ID. Unknown IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Products owned by one category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product
             WHERE category_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Validate and insert a product.
    ///
    /// A `category_id` that does not resolve is reported as a blank category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogWriteError::Invalid` if validation fails.
    /// Returns `CatalogWriteError::Repository` for database errors.
    pub async fn create_product(&self, input: &NewProduct) -> Result<Product, CatalogWriteError> {
        let mut errors = input.validate();
        if let Some(category_id) = input.category_id
            && self.get_category(category_id).await?.is_none()
        {
            errors.add("category", BLANK);
        }

        let (Some(name), Some(price), Some(quantity), Some(category_id), true) = (
            input.name.as_deref(),
            input.price,
            input.quantity,
            input.category_id,
            errors.is_empty(),
        ) else {
            return Err(CatalogWriteError::Invalid(errors));
        };

        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO storefront.product
                (category_id, name, description, image, price_cents, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(category_id)
        .bind(name.trim())
        .bind(non_blank(input.description.as_deref()))
        .bind(non_blank(input.image.as_deref()))
        .bind(price)
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::Database)?;

        Ok(product)
    }

    /// Number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_products(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM storefront.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM storefront.category ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// All categories ordered by name, with their product counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_summaries(&self) -> Result<Vec<CategorySummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, CategorySummary>(
            r"
            SELECT c.id, c.name, c.created_at, c.updated_at, COUNT(p.id) AS product_count
            FROM storefront.category c
            LEFT JOIN storefront.product p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// One category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM storefront.category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// One category by exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM storefront.category WHERE name = $1",
        )
        .bind(name.trim())
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Validate and insert a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogWriteError::Invalid` if the name is blank or taken.
    /// Returns `CatalogWriteError::Repository` for database errors.
    pub async fn create_category(
        &self,
        input: &NewCategory,
    ) -> Result<Category, CatalogWriteError> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(CatalogWriteError::Invalid(errors));
        }

        sqlx::query_as::<_, Category>(
            r"
            INSERT INTO storefront.category (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            ",
        )
        .bind(input.name.trim())
        .fetch_one(self.pool)
        .await
        .map_err(|e| match RepositoryError::from_insert(e, "category name") {
            RepositoryError::Conflict(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("name", TAKEN);
                CatalogWriteError::Invalid(errors)
            }
            other => CatalogWriteError::Repository(other),
        })
    }

    /// Number of categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_categories(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM storefront.category")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Trimmed text, or `None` when blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" apparel1.jpg ")), Some("apparel1.jpg"));
    }
}
