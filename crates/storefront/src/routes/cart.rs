//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each handler locks the session's cart store, runs one operation, and
//! returns the refreshed cart fragment with the operation's toast attached.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use hearth_core::{CartItem, CartItemId, CurrencyCode, Price, ProductSnapshot};

use super::with_outcome;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::state::AppState;
use crate::store::CartStore;

/// HTMX event fired after every cart operation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub can_increment: bool,
    pub can_decrement: bool,
}

impl CartItemView {
    fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.product_title.clone(),
            image: item.product_image.clone(),
            color: item.product_color.clone(),
            size: item.product_size.clone(),
            quantity: item.quantity,
            price: Price::new(item.product_price, currency).display(),
            line_price: Price::new(item.line_total().unwrap_or_default(), currency).display(),
            can_increment: item.can_increment(),
            can_decrement: item.can_decrement(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Snapshot the store for rendering.
    #[must_use]
    pub fn new(store: &CartStore, currency: CurrencyCode) -> Self {
        Self {
            items: store
                .cart()
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            total: Price::new(store.total_amount(), currency).display(),
            item_count: store.item_count(),
        }
    }
}

/// Form naming a single cart entry.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub item_id: CartItemId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Render the cart fragment with the outcome's HTMX headers.
fn cart_fragment(
    store: &CartStore,
    currency: CurrencyCode,
    outcome: &crate::store::Outcome,
) -> Response {
    let cart = CartView::new(store, currency);
    with_outcome(outcome, CART_UPDATED_EVENT, CartItemsTemplate { cart })
}

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    let store = cart.lock().await;

    CartShowTemplate {
        cart: CartView::new(&store, state.config().currency),
    }
}

/// Add a product to the cart (HTMX).
///
/// The body is the product snapshot chosen on the product page. A body that
/// does not decode is a bad request and leaves the cart untouched.
#[instrument(skip_all, fields(product_id))]
pub async fn add(
    State(state): State<AppState>,
    cart: SessionCart,
    payload: std::result::Result<Json<ProductSnapshot>, JsonRejection>,
) -> Result<Response> {
    let Json(snapshot) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::Span::current().record("product_id", snapshot.product.id.as_str());

    let mut store = cart.lock().await;
    let outcome = store.add_to_cart(&snapshot).await;

    if !outcome.is_error() {
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", snapshot.product.id.as_str())]),
        );
    }

    Ok(cart_fragment(&store, state.config().currency, &outcome))
}

/// Remove an entry from the cart (HTMX).
#[instrument(skip_all, fields(item_id = %form.item_id))]
pub async fn remove(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<CartItemForm>,
) -> Response {
    let mut store = cart.lock().await;
    let outcome = store.remove_from_cart(&form.item_id).await;
    cart_fragment(&store, state.config().currency, &outcome)
}

/// Raise an entry's quantity by one (HTMX).
#[instrument(skip_all, fields(item_id = %form.item_id))]
pub async fn increment(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<CartItemForm>,
) -> Response {
    let mut store = cart.lock().await;
    let outcome = store.handle_cart_increment(&form.item_id).await;
    cart_fragment(&store, state.config().currency, &outcome)
}

/// Lower an entry's quantity by one (HTMX).
#[instrument(skip_all, fields(item_id = %form.item_id))]
pub async fn decrement(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<CartItemForm>,
) -> Response {
    let mut store = cart.lock().await;
    let outcome = store.handle_cart_decrement(&form.item_id).await;
    cart_fragment(&store, state.config().currency, &outcome)
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(cart: SessionCart) -> impl IntoResponse {
    let store = cart.lock().await;
    CartCountTemplate {
        count: store.item_count(),
    }
}
