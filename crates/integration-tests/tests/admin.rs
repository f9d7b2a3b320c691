//! Admin panel against a real database.
//!
//! Requires `TEST_DATABASE_URL`; run with `--ignored`.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};

use jungle_admin::middleware::CHALLENGE;
use jungle_integration_tests::{ADMIN_USERNAME, Browser, TestContext};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_dashboard_requires_credentials() {
    let ctx = TestContext::new().await;

    let anonymous = Browser::new(ctx.admin.clone()).get("/").await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.headers[header::WWW_AUTHENTICATE], CHALLENGE);

    let wrong = Browser::new(ctx.admin.clone())
        .with_basic_auth(ADMIN_USERNAME, "not-the-password")
        .get("/")
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_dashboard_shows_counts() {
    let ctx = TestContext::new().await;
    let apparel = ctx.create_category("Apparel").await;
    let electronics = ctx.create_category("Electronics").await;
    for n in 1..=3 {
        ctx.create_product(apparel.id, &format!("Shirt {n}"), 2_500, 5)
            .await;
    }
    ctx.create_product(electronics.id, "Hotdog Slicer", 2_600, 0)
        .await;

    let page = ctx.admin_user().get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<dd id=\"product-count\">4</dd>"));
    assert!(page.body.contains("<dd id=\"category-count\">2</dd>"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_create_category_and_product() {
    let ctx = TestContext::new().await;
    let mut admin = ctx.admin_user();

    let created = admin.post_form("/categories", "name=Garden").await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);

    let duplicate = admin.post_form("/categories", "name=Garden").await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(duplicate.body.contains("Name has already been taken"));

    let categories = admin.get("/categories").await;
    assert!(categories.body.contains("Garden"));

    let garden = jungle_storefront::db::CatalogRepository::new(&ctx.pool)
        .find_category_by_name("Garden")
        .await
        .unwrap()
        .unwrap();

    let product = admin
        .post_form(
            "/products",
            &format!(
                "name=Rake&description=&category_id={}&quantity=3&price=12.50&image=",
                garden.id
            ),
        )
        .await;
    assert_eq!(product.status, StatusCode::SEE_OTHER);
    assert_eq!(product.location(), Some("/products"));

    let listing = admin.get("/products").await;
    assert!(listing.body.contains("Rake"));
    assert!(listing.body.contains("$12.50"));

    let storefront = ctx.shopper().get("/").await;
    assert!(storefront.body.contains("Rake"));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_invalid_product_is_rerendered() {
    let ctx = TestContext::new().await;
    let garden = ctx.create_category("Garden").await;

    let response = ctx
        .admin_user()
        .post_form(
            "/products",
            &format!("name=&category_id={}&quantity=-1&price=", garden.id),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Quantity must be greater than or equal to 0"));

    let page = ctx.admin_user().get("/").await;
    assert!(page.body.contains("<dd id=\"product-count\">0</dd>"));
}
