//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use jungle_core::ProductId;

use super::NavContext;
use crate::error::{AppError, Result};
use crate::models::{Category, Product};
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavContext,
    pub products: Vec<Product>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavContext,
    pub product: Product,
    pub category: Option<Category>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let products = state.catalog().list_products().await?;

    Ok(ProductsIndexTemplate {
        nav: NavContext::from_session(&session).await,
        products,
    })
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let product = catalog
        .get_product(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let category = catalog.get_category(product.category_id).await?;

    Ok(ProductShowTemplate {
        nav: NavContext::from_session(&session).await,
        product,
        category,
    })
}
