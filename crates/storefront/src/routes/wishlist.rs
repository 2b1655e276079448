//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use hearth_core::{CurrencyCode, Price, WishListItem, WishListItemId, WishListRequest};

use super::with_outcome;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::state::AppState;
use crate::store::{CartStore, Outcome};

/// HTMX event fired after every wishlist operation.
pub const WISHLIST_UPDATED_EVENT: &str = "wishlist-updated";

/// Wishlist entry display data for templates.
#[derive(Clone)]
pub struct WishListItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: String,
}

impl WishListItemView {
    fn new(item: &WishListItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.product_title.clone(),
            image: item.product_image.clone(),
            price: Price::new(item.product_price, currency).display(),
        }
    }
}

/// Wishlist display data for templates.
#[derive(Clone)]
pub struct WishListView {
    pub items: Vec<WishListItemView>,
}

impl WishListView {
    #[must_use]
    pub fn new(store: &CartStore, currency: CurrencyCode) -> Self {
        Self {
            items: store
                .wish_list()
                .iter()
                .map(|item| WishListItemView::new(item, currency))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WishListItemForm {
    pub item_id: WishListItemId,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishListShowTemplate {
    pub wishlist: WishListView,
}

/// Wishlist entries fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishListItemsTemplate {
    pub wishlist: WishListView,
}

fn wishlist_fragment(store: &CartStore, currency: CurrencyCode, outcome: &Outcome) -> Response {
    let wishlist = WishListView::new(store, currency);
    with_outcome(
        outcome,
        WISHLIST_UPDATED_EVENT,
        WishListItemsTemplate { wishlist },
    )
}

/// Display wishlist page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> impl IntoResponse {
    let store = cart.lock().await;

    WishListShowTemplate {
        wishlist: WishListView::new(&store, state.config().currency),
    }
}

/// Save a product to the wishlist (HTMX).
#[instrument(skip_all, fields(product_id))]
pub async fn add(
    State(state): State<AppState>,
    cart: SessionCart,
    payload: std::result::Result<Json<WishListRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::Span::current().record("product_id", request.id.as_str());

    let mut store = cart.lock().await;
    let outcome = store.add_to_wish_list(&request).await;

    if !outcome.is_error() {
        add_breadcrumb(
            "wishlist",
            "Saved to wishlist",
            Some(&[("product_id", request.id.as_str())]),
        );
    }

    Ok(wishlist_fragment(&store, state.config().currency, &outcome))
}

/// Remove a wishlist entry (HTMX).
#[instrument(skip_all, fields(item_id = %form.item_id))]
pub async fn remove(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<WishListItemForm>,
) -> Response {
    let mut store = cart.lock().await;
    let outcome = store.remove_from_wish_list(&form.item_id).await;
    wishlist_fragment(&store, state.config().currency, &outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use hearth_core::{UserId, WishListItem};

    use super::super::test_support::{Harness, body_text, notification};
    use crate::storage::{StorageKey, load_collection};

    fn lamp() -> serde_json::Value {
        json!({
            "_id": "lamp-7",
            "name": "Brass Lamp",
            "imagePath": "/images/lamp.png",
            "price": "45.00"
        })
    }

    async fn persisted_wish_list(harness: &Harness, user: &str) -> Vec<WishListItem> {
        load_collection(
            &*harness.storage,
            &StorageKey::wish_list(&UserId::new(user)),
        )
        .await
        .unwrap()
        .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_add_requires_sign_in() {
        let mut harness = Harness::new();

        let response = harness.post_json("/wishlist/add", lamp()).await;

        assert_eq!(response.headers().get("hx-redirect").unwrap(), "/sign-in");
        assert_eq!(
            notification(&response).unwrap()["message"],
            "Please login to add items to wishlist"
        );
        assert!(harness.storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_requires_sign_in() {
        let mut harness = Harness::new();

        let response = harness.post_form("/wishlist/remove", "item_id=abc").await;

        assert_eq!(response.headers().get("hx-redirect").unwrap(), "/sign-in");
        assert_eq!(
            notification(&response).unwrap()["message"],
            "Please login to remove items from Wishlist"
        );
    }

    #[tokio::test]
    async fn test_add_with_malformed_body_is_bad_request() {
        let mut harness = Harness::new();
        harness.sign_in("user_2").await;

        let response = harness.post_json("/wishlist/add", json!(["lamp-7"])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(persisted_wish_list(&harness, "user_2").await.is_empty());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let mut harness = Harness::new();
        harness.sign_in("user_2").await;

        let response = harness.post_json("/wishlist/add", lamp()).await;
        assert_eq!(
            notification(&response).unwrap()["message"],
            "Item added to Wishlist"
        );
        let html = body_text(response).await;
        assert!(html.contains("Brass Lamp"));
        assert!(html.contains("$45.00"));

        let response = harness.post_json("/wishlist/add", lamp()).await;
        let notify = notification(&response).unwrap();
        assert_eq!(notify["level"], "success");
        assert_eq!(notify["message"], "Item Already in wishlist");

        let persisted = persisted_wish_list(&harness, "user_2").await;
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].product_id.as_str(), "lamp-7");
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let mut harness = Harness::new();
        harness.sign_in("user_2").await;
        harness.post_json("/wishlist/add", lamp()).await;

        let entry_id = persisted_wish_list(&harness, "user_2").await[0].id.clone();
        let response = harness
            .post_form("/wishlist/remove", &format!("item_id={entry_id}"))
            .await;

        assert_eq!(
            notification(&response).unwrap()["message"],
            "Item removed from Wishlist"
        );
        assert!(body_text(response).await.contains("Your wishlist is empty"));
        assert!(persisted_wish_list(&harness, "user_2").await.is_empty());
    }

    #[tokio::test]
    async fn test_wishlist_page() {
        let mut harness = Harness::new();
        harness.sign_in("user_2").await;
        harness.post_json("/wishlist/add", lamp()).await;

        let html = body_text(harness.get("/wishlist").await).await;

        assert!(html.contains("<title>Wishlist</title>"));
        assert!(html.contains("Brass Lamp"));
    }
}
