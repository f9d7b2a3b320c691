//! Jungle Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! Every page except the health checks requires the HTTP Basic credentials
//! configured in `ADMIN_USERNAME_KEY` / `ADMIN_PASSWORD_KEY`. Bind to a
//! private interface; Basic auth sends credentials on every request.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use jungle_storefront::middleware::{request_id_middleware, security_headers_middleware};
use state::AppState;

/// Build the admin router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let credentials = state.config().credentials.clone();

    Router::new()
        .merge(routes::routes().route_layer(axum::middleware::from_fn_with_state(
            credentials,
            middleware::require_basic_auth,
        )))
        .merge(routes::health_routes())
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AdminConfig;
    use crate::middleware::CHALLENGE;

    /// Router whose pool never connects.
    fn test_app() -> Router {
        let config = AdminConfig::from_vars(|key| {
            match key {
                "ADMIN_DATABASE_URL" => Some("postgres://localhost/jungle_unused"),
                "ADMIN_USERNAME_KEY" => Some("jungle"),
                "ADMIN_PASSWORD_KEY" => Some("k7#Qm2!vRw9z"),
                _ => None,
            }
            .map(str::to_string)
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/jungle_unused")
            .unwrap();
        app(AppState::new(config, pool))
    }

    #[tokio::test]
    async fn test_every_page_requires_credentials() {
        for path in ["/", "/products", "/products/new", "/categories"] {
            let response = test_app()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], CHALLENGE);
        }
    }

    #[tokio::test]
    async fn test_create_requires_credentials() {
        let response = test_app()
            .oneshot(
                Request::post("/categories")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("name=Apparel"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
