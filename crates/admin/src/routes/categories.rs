//! Category management route handlers.

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

use jungle_storefront::db::catalog::{CatalogWriteError, CategorySummary};
use jungle_storefront::models::NewCategory;

use crate::{error::Result, state::AppState};

/// New category form data.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

/// Category listing template, including the new category form.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub current_path: &'static str,
    pub categories: Vec<CategorySummary>,
    pub name: String,
    pub errors: Vec<String>,
}

/// Display categories with their product counts.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(CategoriesIndexTemplate {
        current_path: "/categories",
        categories: state.catalog().category_summaries().await?,
        name: String::new(),
        errors: Vec::new(),
    })
}

/// Create a category; a blank or taken name re-renders with 422.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let catalog = state.catalog();
    let input = NewCategory { name: form.name };

    match catalog.create_category(&input).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "category created");
            Ok(Redirect::to("/categories").into_response())
        }
        Err(CatalogWriteError::Invalid(errors)) => {
            let page = CategoriesIndexTemplate {
                current_path: "/categories",
                categories: catalog.category_summaries().await?,
                name: input.name,
                errors: errors.full_messages(),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(CatalogWriteError::Repository(e)) => Err(e.into()),
    }
}
