//! Registration and login against a real database.
//!
//! Requires `TEST_DATABASE_URL`; run with `--ignored`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use jungle_core::Email;
use jungle_integration_tests::TestContext;
use jungle_storefront::db::UserRepository;
use jungle_storefront::routes::auth::LOGIN_FAILED_MESSAGE;

const PASSWORD: &str = "correct horse";

fn login_form(email: &str, password: &str) -> String {
    format!(
        "email={}&password={}",
        email.replace('@', "%40").replace(' ', "+"),
        password.replace(' ', "+")
    )
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_register_logs_in_and_normalizes_email() {
    let ctx = TestContext::new().await;
    let mut shopper = ctx.shopper();

    let response = shopper
        .post_form(
            "/auth/register",
            "first_name=Kyle&last_name=Doe&email=+Kyle%40Example.COM+\
             &password=correct+horse&password_confirmation=correct+horse",
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let (stored, _) = UserRepository::new(&ctx.pool)
        .get_with_password_hash(&Email::normalize("kyle@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.first_name, "Kyle");
    assert_eq!(stored.email.as_str(), "kyle@example.com");

    let home = shopper.get("/").await;
    assert!(home.body.contains("Signed in as Kyle"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_register_rejects_taken_email_in_any_case() {
    let ctx = TestContext::new().await;
    ctx.register_user("kyle@example.com", PASSWORD).await;

    let response = ctx
        .shopper()
        .post_form(
            "/auth/register",
            "first_name=Kyle&last_name=Doe&email=KYLE%40example.com\
             &password=correct+horse&password_confirmation=correct+horse",
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email has already been taken"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_register_reports_mismatched_confirmation() {
    let ctx = TestContext::new().await;

    let response = ctx
        .shopper()
        .post_form(
            "/auth/register",
            "first_name=Kyle&last_name=Doe&email=kyle%40example.com\
             &password=correct+horse&password_confirmation=battery+staple",
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Password confirmation doesn"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_login_accepts_any_email_spelling() {
    let ctx = TestContext::new().await;
    ctx.register_user("kyle@example.com", PASSWORD).await;

    for email in [
        "kyle@example.com",
        "  kyle@example.com  ",
        "KYLE@EXAMPLE.COM",
        "  KyLe@ExAmPlE.cOm ",
    ] {
        let mut shopper = ctx.shopper();
        let response = shopper
            .post_form("/auth/login", &login_form(email, PASSWORD))
            .await;

        assert_eq!(response.status, StatusCode::SEE_OTHER, "{email:?}");
        assert_eq!(response.location(), Some("/"));
        assert!(shopper.get("/").await.body.contains("Signed in as Kyle"));
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_login_failures_look_the_same() {
    let ctx = TestContext::new().await;
    ctx.register_user("kyle@example.com", PASSWORD).await;

    let wrong_password = ctx
        .shopper()
        .post_form("/auth/login", &login_form("kyle@example.com", "wrong one"))
        .await;
    let unknown_email = ctx
        .shopper()
        .post_form("/auth/login", &login_form("nobody@example.com", PASSWORD))
        .await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body.contains(LOGIN_FAILED_MESSAGE));
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_logout_keeps_cart() {
    let ctx = TestContext::new().await;
    ctx.register_user("kyle@example.com", PASSWORD).await;
    let mut shopper = ctx.shopper();

    shopper
        .post_form("/auth/login", &login_form("kyle@example.com", PASSWORD))
        .await;
    shopper.post_form("/cart/add", "product_id=1").await;

    let response = shopper.post_form("/auth/logout", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let home = shopper.get("/").await;
    assert!(!home.body.contains("Signed in as"));
    assert!(home.body.contains("My Cart (1)"));
}
