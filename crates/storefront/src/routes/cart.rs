//! Cart route handlers.
//!
//! The cart lives in the session as a [`Cart`] of product IDs and quantities.
//! Mutations answer HTMX requests with fragments and plain form posts with a
//! redirect, so the pages work without JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jungle_core::{Price, ProductId};

use super::NavContext;
use crate::error::{AppError, Result};
use crate::models::{Cart, Product, session_keys};
use crate::state::AppState;

/// Event name sent in `HX-Trigger` after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// One cart line joined with its product.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart display data for templates.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: Price,
    pub item_count: u64,
}

impl CartView {
    /// Join cart lines with `products`.
    ///
    /// Lines whose product is missing from `products` are dropped. Returns
    /// `None` if a total overflows.
    #[must_use]
    pub fn build(cart: &Cart, products: &[Product]) -> Option<Self> {
        let mut view = Self::default();

        for item in cart.line_items() {
            let Some(product) = products.iter().find(|p| p.id == item.product_id) else {
                continue;
            };
            let line_total = product.price.checked_mul(item.quantity)?;
            view.subtotal = view.subtotal.checked_add(line_total)?;
            view.item_count += u64::from(item.quantity);
            view.lines.push(CartLineView {
                product: product.clone(),
                quantity: item.quantity,
                line_total,
            });
        }

        Some(view)
    }

    /// Whether no lines are shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session; missing or unreadable means empty.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Whether the request was issued by HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Path to send a non-HTMX form post back to.
///
/// Only a `Referer` on this site (under `base_url`) is followed; anything
/// else goes to the home page.
fn redirect_target(referer: Option<&str>, base_url: &str) -> String {
    referer
        .and_then(|r| r.strip_prefix(base_url.trim_end_matches('/')))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .map_or_else(|| "/".to_string(), str::to_string)
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count indicator fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Join the session cart with the catalog, pruning lines for deleted products.
async fn cart_view(state: &AppState, session: &Session) -> Result<CartView> {
    let mut cart = load_cart(session).await;
    if cart.is_empty() {
        return Ok(CartView::default());
    }

    let products = state.catalog().products_by_ids(&cart.product_ids()).await?;
    let view = CartView::build(&cart, &products)
        .ok_or_else(|| AppError::Internal("cart total overflow".to_string()))?;

    if view.lines.len() != cart.line_items().len() {
        for id in cart.product_ids() {
            if !products.iter().any(|p| p.id == id) {
                cart.remove(id);
            }
        }
        save_cart(session, &cart).await?;
    }

    Ok(view)
}

/// Reply to a cart mutation: fragment for HTMX, redirect for plain forms.
fn mutation_response(fragment: impl IntoResponse, htmx: bool, target: &str) -> Response {
    if htmx {
        (AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), fragment).into_response()
    } else {
        Redirect::to(target).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = cart_view(&state, &session).await?;

    Ok(CartShowTemplate {
        nav: NavContext::from_session(&session).await,
        cart,
    })
}

/// Add item to cart.
///
/// The product is not looked up here; unknown IDs are pruned when the cart
/// page is rendered.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    let quantity = cart.add(ProductId::new(form.product_id), form.quantity.unwrap_or(1));
    save_cart(&session, &cart).await?;

    tracing::debug!(product_id = form.product_id, quantity, "added to cart");

    let referer = headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok());
    let target = redirect_target(referer, &state.config().base_url);

    Ok(mutation_response(
        CartCountTemplate {
            count: cart.count(),
        },
        is_htmx(&headers),
        &target,
    ))
}

/// Update cart item quantity. Zero removes the line.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    let cart = cart_view(&state, &session).await?;
    Ok(mutation_response(CartItemsTemplate { cart }, true, "/cart"))
}

/// Remove item from cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    if cart.remove(ProductId::new(form.product_id)) {
        save_cart(&session, &cart).await?;
    }

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    let cart = cart_view(&state, &session).await?;
    Ok(mutation_response(CartItemsTemplate { cart }, true, "/cart"))
}

/// Get cart count indicator (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&session).await.count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;

    use jungle_core::CategoryId;

    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            category_id: CategoryId::new(1),
            name: format!("Product {id}"),
            description: None,
            image: None,
            price: Price::from_cents(cents),
            quantity: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(2), 1);

        let view = CartView::build(&cart, &[product(1, 2_500), product(2, 6_499)]).unwrap();

        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, Price::from_cents(11_499));
        assert_eq!(view.subtotal.to_string(), "$114.99");
    }

    #[test]
    fn test_cart_view_drops_missing_products() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), 1);
        cart.add(ProductId::new(99), 4);

        let view = CartView::build(&cart, &[product(1, 100)]).unwrap();

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.item_count, 1);
        assert_eq!(view.subtotal, Price::from_cents(100));
    }

    #[test]
    fn test_cart_view_overflow() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), u32::MAX);

        assert!(CartView::build(&cart, &[product(1, i64::MAX)]).is_none());
    }

    #[test]
    fn test_redirect_target() {
        let base = "https://jungle.example";
        assert_eq!(
            redirect_target(Some("https://jungle.example/products/3"), base),
            "/products/3"
        );
        assert_eq!(
            redirect_target(
                Some("https://jungle.example/categories/1?page=2"),
                "https://jungle.example/"
            ),
            "/categories/1?page=2"
        );
        assert_eq!(redirect_target(Some("https://evil.example/"), base), "/");
        assert_eq!(
            redirect_target(Some("https://jungle.example.evil.example/"), base),
            "/"
        );
        assert_eq!(redirect_target(Some("https://jungle.example//evil"), base), "/");
        assert_eq!(redirect_target(None, base), "/");
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
