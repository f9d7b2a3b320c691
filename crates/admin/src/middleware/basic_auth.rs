//! HTTP Basic authentication guard.
//!
//! The whole admin panel sits behind a single username/password pair read
//! from the environment at startup. Both values are compared in constant time.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::ExposeSecret;

use crate::config::AdminCredentials;

/// `WWW-Authenticate` challenge sent with every 401.
pub const CHALLENGE: &str = "Basic realm=\"Jungle Admin\"";

/// Middleware that rejects requests without valid Basic credentials.
///
/// Install with `axum::middleware::from_fn_with_state(credentials, require_basic_auth)`.
pub async fn require_basic_auth(
    State(credentials): State<AdminCredentials>,
    request: Request,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic_header);

    match supplied {
        Some((username, password)) if credentials_match(&credentials, &username, &password) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::info!(path = %request.uri().path(), "admin credentials rejected");
            challenge()
        }
        None => challenge(),
    }
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE))],
        "Unauthorized",
    )
        .into_response()
}

/// Decode `Basic <base64(username:password)>`.
fn parse_basic_header(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Check both values without short-circuiting on the first mismatch.
#[allow(clippy::needless_bitwise_bool)]
fn credentials_match(expected: &AdminCredentials, username: &str, password: &str) -> bool {
    let username_ok = constant_time_compare(&expected.username, username);
    let password_ok = constant_time_compare(expected.password.expose_secret(), password);
    username_ok & password_ok
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;

    fn credentials() -> AdminCredentials {
        AdminCredentials {
            username: "jungle".to_string(),
            password: SecretString::from("k7#Qm2!vRw9z"),
        }
    }

    fn basic(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "dashboard" }))
            .layer(middleware::from_fn_with_state(
                credentials(),
                require_basic_auth,
            ))
    }

    async fn request_with(authorization: Option<&str>) -> Response {
        let mut request = HttpRequest::get("/");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hello!"));
    }

    #[test]
    fn test_parse_basic_header() {
        assert_eq!(
            parse_basic_header(&basic("jungle", "a:b")),
            Some(("jungle".to_string(), "a:b".to_string()))
        );
        assert_eq!(
            parse_basic_header("basic am9objpwdw=="),
            Some(("john".to_string(), "pw".to_string()))
        );
        assert_eq!(parse_basic_header("Bearer abc"), None);
        assert_eq!(parse_basic_header("Basic !!!"), None);
        assert_eq!(parse_basic_header("Basic am9obg=="), None);
    }

    #[tokio::test]
    async fn test_missing_credentials_challenged() {
        let response = request_with(None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], CHALLENGE);
    }

    #[tokio::test]
    async fn test_wrong_credentials_challenged() {
        for (user, pass) in [("jungle", "wrong"), ("admin", "k7#Qm2!vRw9z"), ("", "")] {
            let response = request_with(Some(&basic(user, pass))).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{user}:{pass}");
        }
    }

    #[tokio::test]
    async fn test_valid_credentials_pass() {
        let response = request_with(Some(&basic("jungle", "k7#Qm2!vRw9z"))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
