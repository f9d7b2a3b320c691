//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::{error::Result, state::AppState};

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: &'static str,
    pub product_count: i64,
    pub category_count: i64,
}

/// Display the dashboard with catalog counts.
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let (product_count, category_count) =
        tokio::try_join!(catalog.count_products(), catalog.count_categories())?;

    Ok(DashboardTemplate {
        current_path: "/",
        product_count,
        category_count,
    })
}
