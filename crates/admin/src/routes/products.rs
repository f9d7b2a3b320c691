//! Product management route handlers.

use std::collections::HashMap;
use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use jungle_core::{CategoryId, Price, ValidationErrors};
use jungle_storefront::db::catalog::CatalogWriteError;
use jungle_storefront::models::{Category, NewProduct, Product};

use crate::{error::Result, state::AppState};

/// Product table row.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub product: Product,
    pub category_name: String,
}

/// Raw product form. Every field arrives as text so bad input can be
/// reported next to the field instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub quantity: String,
    pub category_id: String,
}

impl ProductForm {
    /// Convert to catalog input, collecting values that do not parse.
    #[must_use]
    pub fn to_new_product(&self) -> (NewProduct, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let input = NewProduct {
            name: non_blank(&self.name),
            description: non_blank(&self.description),
            image: non_blank(&self.image),
            price: parse_field::<Price>(&self.price, "price", &mut errors),
            quantity: parse_field::<i32>(&self.quantity, "quantity", &mut errors),
            category_id: parse_field::<CategoryId>(&self.category_id, "category", &mut errors),
        };

        (input, errors)
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Blank is `None`; garbage is `None` plus an error on `field`.
fn parse_field<T: FromStr>(
    raw: &str,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().map_or_else(
        |_| {
            errors.add(field, "is not a number");
            None
        },
        Some,
    )
}

/// Parse errors first, then any rule failure on a field that parsed.
fn merge_errors(parse_errors: ValidationErrors, rules: &ValidationErrors) -> ValidationErrors {
    let mut merged = parse_errors.clone();
    for error in rules {
        if parse_errors.on(error.field).is_empty() {
            merged.add(error.field, error.message.clone());
        }
    }
    merged
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: &'static str,
    pub rows: Vec<ProductRow>,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct NewProductTemplate {
    pub current_path: &'static str,
    pub categories: Vec<Category>,
    pub form: ProductForm,
    pub errors: Vec<String>,
}

/// Display the product table.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let (products, categories) =
        tokio::try_join!(catalog.list_products(), catalog.list_categories())?;

    let names: HashMap<CategoryId, String> =
        categories.into_iter().map(|c| (c.id, c.name)).collect();
    let rows = products
        .into_iter()
        .map(|product| ProductRow {
            category_name: names.get(&product.category_id).cloned().unwrap_or_default(),
            product,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        current_path: "/products",
        rows,
    })
}

/// Display the new product form.
#[instrument(skip(state))]
pub async fn new(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(NewProductTemplate {
        current_path: "/products",
        categories: state.catalog().list_categories().await?,
        form: ProductForm::default(),
        errors: Vec::new(),
    })
}

/// Create a product; validation failures re-render the form with 422.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let catalog = state.catalog();
    let (input, parse_errors) = form.to_new_product();

    let result = if parse_errors.is_empty() {
        catalog.create_product(&input).await
    } else {
        Err(CatalogWriteError::Invalid(merge_errors(
            parse_errors,
            &input.validate(),
        )))
    };

    match result {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");
            Ok(Redirect::to("/products").into_response())
        }
        Err(CatalogWriteError::Invalid(errors)) => {
            let page = NewProductTemplate {
                current_path: "/products",
                categories: catalog.list_categories().await?,
                form,
                errors: errors.full_messages(),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(CatalogWriteError::Repository(e)) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Men's Classy shirt".to_string(),
            description: "Classy".to_string(),
            image: String::new(),
            price: "64.99".to_string(),
            quantity: "10".to_string(),
            category_id: "1".to_string(),
        }
    }

    #[test]
    fn test_complete_form_parses() {
        let (input, errors) = form().to_new_product();
        assert!(errors.is_empty());
        assert_eq!(input.price, Some(Price::from_cents(6499)));
        assert_eq!(input.quantity, Some(10));
        assert_eq!(input.category_id, Some(CategoryId::new(1)));
        assert_eq!(input.image, None);
        assert!(input.validate().is_empty());
    }

    #[test]
    fn test_blank_fields_report_blank() {
        let (input, errors) = ProductForm::default().to_new_product();
        assert!(errors.is_empty());
        assert_eq!(
            input.validate().full_messages(),
            vec![
                "Name can't be blank",
                "Price can't be blank",
                "Quantity can't be blank",
                "Category can't be blank",
            ]
        );
    }

    #[test]
    fn test_garbage_reported_once_per_field() {
        let bad = ProductForm {
            price: "cheap".to_string(),
            name: String::new(),
            ..form()
        };
        let (input, parse_errors) = bad.to_new_product();
        let merged = merge_errors(parse_errors, &input.validate());

        assert_eq!(
            merged.full_messages(),
            vec!["Price is not a number", "Name can't be blank"]
        );
    }
}
