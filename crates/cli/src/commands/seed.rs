//! Seed categories and products from a YAML catalog.
//!
//! Without `--file` the built-in demo catalog (`crates/cli/seed/catalog.yaml`)
//! is used. Categories are matched by name and products by name within their
//! category, so seeding twice inserts nothing new.
//!
//! # File Format
//!
//! ```yaml
//! categories:
//!   - name: Apparel
//!     products:
//!       - name: Hipster Hat
//!         description: Wide brim, narrow audience.
//!         image: https://cdn.example.com/hat.jpg
//!         price: "34.49"
//!         quantity: 4
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use jungle_core::{CategoryId, Price};
use jungle_storefront::db::CatalogRepository;
use jungle_storefront::models::{NewCategory, NewProduct};

use super::{CliError, connect};

const BUILTIN_CATALOG: &str = include_str!("../../seed/catalog.yaml");

/// Top-level catalog file.
#[derive(Debug, Deserialize)]
pub struct SeedCatalog {
    pub categories: Vec<SeedCategory>,
}

/// A category and the products to create in it.
#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// One product entry. `price` is a dollar string such as `"64.99"`.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub price: String,
    pub quantity: i32,
}

impl SeedProduct {
    fn to_new_product(&self, category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: Some(self.name.clone()),
            description: self.description.clone(),
            image: self.image.clone(),
            price: self.price.parse::<Price>().ok(),
            quantity: Some(self.quantity),
            category_id: Some(category_id),
        }
    }
}

/// Counts reported after a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub products_inserted: usize,
    pub products_skipped: usize,
}

/// Parse catalog YAML.
///
/// # Errors
///
/// Returns `CliError::Yaml` if the document does not match [`SeedCatalog`].
pub fn parse_catalog(content: &str) -> Result<SeedCatalog, CliError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Check every entry against the category and product rules.
///
/// Returns one message per failure, prefixed with the entry it came from.
#[must_use]
pub fn validate_catalog(catalog: &SeedCatalog) -> Vec<String> {
    let mut problems = Vec::new();

    for category in &catalog.categories {
        let new_category = NewCategory {
            name: category.name.clone(),
        };
        for message in new_category.validate().full_messages() {
            problems.push(format!("category {:?}: {message}", category.name));
        }

        for product in &category.products {
            if product.price.parse::<Price>().is_err() {
                problems.push(format!(
                    "product {:?}: Price {:?} is not a dollar amount",
                    product.name, product.price
                ));
            }
            let errors = product.to_new_product(CategoryId::new(0)).validate();
            for message in errors.full_messages() {
                // An unparseable price is already reported above
                if !message.starts_with("Price") {
                    problems.push(format!("product {:?}: {message}", product.name));
                }
            }
        }
    }

    problems
}

/// Seed the database from `file`, or from the built-in catalog.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails.
pub async fn run(file: Option<&Path>) -> Result<SeedSummary, CliError> {
    let content = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::Io {
                    path: path.display().to_string(),
                    source,
                })?
        }
        None => {
            info!("Loading built-in demo catalog");
            BUILTIN_CATALOG.to_string()
        }
    };

    // Validate before touching the database
    let catalog = parse_catalog(&content)?;
    let problems = validate_catalog(&catalog);
    if !problems.is_empty() {
        error!("Catalog validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(CliError::Catalog(problems.len()));
    }

    let pool = connect().await?;
    let summary = seed_catalog(&CatalogRepository::new(&pool), &catalog).await?;

    info!("Seeding complete!");
    info!("  Categories created: {}", summary.categories_created);
    info!("  Products inserted: {}", summary.products_inserted);
    info!("  Products skipped (already exist): {}", summary.products_skipped);

    Ok(summary)
}

/// Insert whatever part of `catalog` is not in the database yet.
///
/// # Errors
///
/// Returns an error if a database operation fails or an insert is refused.
pub async fn seed_catalog(
    repo: &CatalogRepository<'_>,
    catalog: &SeedCatalog,
) -> Result<SeedSummary, CliError> {
    let mut summary = SeedSummary::default();

    for entry in &catalog.categories {
        let category = if let Some(existing) = repo.find_category_by_name(&entry.name).await? {
            existing
        } else {
            let created = repo
                .create_category(&NewCategory {
                    name: entry.name.clone(),
                })
                .await?;
            summary.categories_created += 1;
            created
        };

        let existing = repo.products_in_category(category.id).await?;

        for product in &entry.products {
            if existing.iter().any(|p| p.name == product.name.trim()) {
                summary.products_skipped += 1;
                continue;
            }
            repo.create_product(&product.to_new_product(category.id))
                .await?;
            summary.products_inserted += 1;
        }

        info!(category = %category.name, products = entry.products.len(), "Seeded category");
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = parse_catalog(BUILTIN_CATALOG).unwrap();

        assert_eq!(catalog.categories.len(), 3);
        assert!(catalog.categories.iter().all(|c| !c.products.is_empty()));
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn test_builtin_catalog_has_sold_out_product() {
        let catalog = parse_catalog(BUILTIN_CATALOG).unwrap();
        assert!(
            catalog
                .categories
                .iter()
                .flat_map(|c| &c.products)
                .any(|p| p.quantity == 0)
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let catalog = parse_catalog(
            r#"
categories:
  - name: Garden
  - name: Tools
    products:
      - name: Rake
        price: "12.50"
        quantity: 3
"#,
        )
        .unwrap();

        assert!(catalog.categories[0].products.is_empty());
        let rake = &catalog.categories[1].products[0];
        assert_eq!(rake.description, None);
        assert_eq!(
            rake.to_new_product(CategoryId::new(1)).price,
            Some(Price::from_cents(1_250))
        );
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let catalog = parse_catalog(
            r#"
categories:
  - name: "  "
    products:
      - name: Rake
        price: "twelve"
        quantity: 3
      - name: ""
        price: "1.00"
        quantity: -1
"#,
        )
        .unwrap();

        let problems = validate_catalog(&catalog);

        assert_eq!(problems.len(), 4, "{problems:?}");
        assert!(problems[0].contains("Name can't be blank"));
        assert!(problems[1].contains("\"twelve\" is not a dollar amount"));
        assert!(problems.iter().any(|p| p.contains("Quantity must be greater")));
    }

    #[test]
    fn test_missing_price_is_a_parse_error() {
        let err = parse_catalog("categories:\n  - name: X\n    products:\n      - name: Y\n        quantity: 1\n")
            .unwrap_err();
        assert!(matches!(err, CliError::Yaml(_)));
    }
}
