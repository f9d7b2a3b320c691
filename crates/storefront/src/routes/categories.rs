//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use jungle_core::CategoryId;

use super::NavContext;
use crate::error::{AppError, Result};
use crate::models::{Category, Product};
use crate::state::AppState;

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub nav: NavContext,
    pub category: Category,
    pub products: Vec<Product>,
}

/// Display the products of one category.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let category = catalog
        .get_category(CategoryId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    let products = catalog.products_in_category(category.id).await?;

    Ok(CategoryShowTemplate {
        nav: NavContext::from_session(&session).await,
        category,
        products,
    })
}
