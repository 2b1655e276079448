//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (durable storage reachable)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add product snapshot (JSON), returns cart_items fragment
//! POST /cart/remove            - Remove entry, returns cart_items fragment
//! POST /cart/increment         - Quantity +1, returns cart_items fragment
//! POST /cart/decrement         - Quantity -1, returns cart_items fragment
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Wishlist (HTMX fragments)
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Save product (JSON), returns wishlist_items fragment
//! POST /wishlist/remove        - Remove entry, returns wishlist_items fragment
//! ```
//!
//! Every mutating route reports its toast through an `HX-Trigger` header
//! (`{"notify": {"level": ..., "message": ...}}`) and, when the shopper must
//! sign in first, sets `HX-Redirect` to the sign-in path.

pub mod cart;
pub mod wishlist;

use axum::{
    Router,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::state::AppState;
use crate::store::Outcome;

const HX_TRIGGER: &str = "hx-trigger";
const HX_REDIRECT: &str = "hx-redirect";

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies durable storage before returning OK.
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storage().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Attach a store outcome to a fragment response as HTMX headers.
///
/// `event` is always triggered so other fragments (count badges, totals)
/// can refresh; the toast rides along under `notify`.
fn with_outcome(outcome: &Outcome, event: &str, body: impl IntoResponse) -> Response {
    let mut trigger = serde_json::Map::new();
    trigger.insert(event.to_owned(), serde_json::Value::Null);
    if let Some(notification) = outcome.notification() {
        match serde_json::to_value(notification) {
            Ok(value) => {
                trigger.insert("notify".to_owned(), value);
            }
            Err(e) => tracing::warn!("Failed to encode notification: {e}"),
        }
    }

    let mut response = body.into_response();
    let headers = response.headers_mut();

    match HeaderValue::from_str(&serde_json::Value::Object(trigger).to_string()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(HX_TRIGGER), value);
        }
        Err(e) => tracing::warn!("Notification is not a valid header value: {e}"),
    }

    if let Some(path) = outcome.redirect() {
        match HeaderValue::from_str(path) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(HX_REDIRECT), value);
            }
            Err(e) => tracing::warn!("Redirect path is not a valid header value: {e}"),
        }
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    //! Router harness driving requests through the session layer.

    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        extract::Path,
        http::{Request, Response, header},
        routing::post,
    };
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session};

    use hearth_core::UserId;

    use crate::config::StorefrontConfig;
    use crate::middleware::{create_session_layer, set_current_user, sign_out};
    use crate::state::AppState;
    use crate::storage::MemoryStorage;

    /// Stand-in for the identity provider's sign-in callback.
    async fn test_sign_in(session: Session, Path(user): Path<String>) -> &'static str {
        set_current_user(&session, &UserId::new(user)).await.unwrap();
        "signed in"
    }

    async fn test_sign_out(
        axum::extract::State(state): axum::extract::State<AppState>,
        session: Session,
    ) -> &'static str {
        sign_out(&session, &state).await.unwrap();
        "signed out"
    }

    pub struct Harness {
        pub router: Router,
        pub storage: Arc<MemoryStorage>,
        cookie: Option<String>,
    }

    impl Harness {
        pub fn new() -> Self {
            let config = StorefrontConfig::from_lookup(|key| match key {
                "STOREFRONT_STORAGE" => Some("memory".to_string()),
                "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_string()),
                _ => None,
            })
            .unwrap();

            let storage = Arc::new(MemoryStorage::new());
            let state = AppState::new(config.clone(), storage.clone());
            let router = super::routes()
                .route("/test/sign-in/{user}", post(test_sign_in))
                .route("/test/sign-out", post(test_sign_out))
                .layer(create_session_layer(MemoryStore::default(), &config))
                .with_state(state);

            Self {
                router,
                storage,
                cookie: None,
            }
        }

        /// Send a request, carrying the session cookie between calls.
        pub async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
            if let Some(cookie) = &self.cookie {
                request
                    .headers_mut()
                    .insert(header::COOKIE, cookie.parse().unwrap());
            }

            let response = self.router.clone().oneshot(request).await.unwrap();

            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie
                    .to_str()
                    .unwrap()
                    .split(';')
                    .next()
                    .unwrap()
                    .to_string();
                self.cookie = Some(pair);
            }

            response
        }

        pub async fn sign_in(&mut self, user: &str) {
            let request = Request::post(format!("/test/sign-in/{user}"))
                .body(Body::empty())
                .unwrap();
            self.send(request).await;
        }

        pub async fn sign_out(&mut self) {
            let request = Request::post("/test/sign-out").body(Body::empty()).unwrap();
            self.send(request).await;
        }

        pub async fn get(&mut self, uri: &str) -> Response<Body> {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        pub async fn post_json(&mut self, uri: &str, json: serde_json::Value) -> Response<Body> {
            let request = Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap();
            self.send(request).await
        }

        pub async fn post_form(&mut self, uri: &str, form: &str) -> Response<Body> {
            let request = Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap();
            self.send(request).await
        }
    }

    /// Decode the `notify` payload of an `HX-Trigger` header.
    pub fn notification(response: &Response<Body>) -> Option<serde_json::Value> {
        let raw = response.headers().get("hx-trigger")?.to_str().ok()?;
        let trigger: serde_json::Value = serde_json::from_str(raw).ok()?;
        trigger.get("notify").cloned()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::test_support::{Harness, body_text};

    #[tokio::test]
    async fn test_health() {
        let mut harness = Harness::new();
        let response = harness.get("/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_readiness_with_memory_storage() {
        let mut harness = Harness::new();
        let response = harness.get("/health/ready").await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
