//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database ping)
//!
//! # Products
//! GET  /api/products              - Product listing (category filter, sort)
//! GET  /api/products/{id}         - Product detail
//!
//! # Cart
//! GET    /api/cart                - Reconciled cart with summary
//! POST   /api/cart/items          - Add a line
//! PATCH  /api/cart/items/{id}     - Set a line's quantity (<= 0 removes)
//! DELETE /api/cart/items/{id}     - Remove a line
//! DELETE /api/cart                - Clear the cart
//!
//! # Wishlist
//! GET    /api/wishlist            - Reconciled wishlist
//! POST   /api/wishlist/toggle     - Toggle a product
//! DELETE /api/wishlist/{id}       - Remove a product
//! DELETE /api/wishlist            - Clear the wishlist
//!
//! # Auth
//! POST /api/auth/login            - Store a validated email identity
//! POST /api/auth/logout           - Clear the identity
//! GET  /api/auth/me               - Current identity, if any
//!
//! # Checkout & Orders
//! POST /api/checkout              - Open a gateway order from the cart
//! POST /api/payment/verify        - Verify the payment signature
//! GET  /api/orders                - Completed orders (requires auth)
//! POST /api/orders/{id}/cancel    - Cancel an owned order (requires auth)
//! ```
//!
//! Every cart/wishlist handler builds a fresh reconciliation engine, runs it
//! against the session identity, applies its mutation, and saves. The engine
//! decides which store the data lives in; handlers never touch stores
//! directly.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_sessions::Session;

use aroura_core::{Cart, Wishlist};

use crate::commerce::{
    GUEST_CART_KEY, GUEST_WISHLIST_KEY, Reconciliation, SessionGuestStore, SyncedCollection,
};
use crate::db::PgRemoteStore;
use crate::middleware::auth_state;
use crate::state::AppState;

/// Cart engine over the production stores.
pub type CartSync = SyncedCollection<Cart, SessionGuestStore, PgRemoteStore<Cart>>;

/// Wishlist engine over the production stores.
pub type WishlistSync = SyncedCollection<Wishlist, SessionGuestStore, PgRemoteStore<Wishlist>>;

/// Build and reconcile the caller's cart engine.
pub(crate) async fn load_cart(state: &AppState, session: &Session) -> (CartSync, Reconciliation) {
    let auth = auth_state(session).await;
    let mut sync = SyncedCollection::new(
        GUEST_CART_KEY,
        SessionGuestStore::new(session.clone()),
        PgRemoteStore::cart(state.pool().clone()),
    );
    let outcome = sync.reconcile(&auth).await;
    (sync, outcome)
}

/// Build and reconcile the caller's wishlist engine.
pub(crate) async fn load_wishlist(
    state: &AppState,
    session: &Session,
) -> (WishlistSync, Reconciliation) {
    let auth = auth_state(session).await;
    let mut sync = SyncedCollection::new(
        GUEST_WISHLIST_KEY,
        SessionGuestStore::new(session.clone()),
        PgRemoteStore::wishlist(state.pool().clone()),
    );
    let outcome = sync.reconcile(&auth).await;
    (sync, outcome)
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{line_id}",
            delete(cart::remove).patch(cart::update_quantity),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/toggle", post(wishlist::toggle))
        .route("/{product_id}", delete(wishlist::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check: pings the database.
pub async fn health_ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        })?;
    Ok(Json(json!({ "status": "ready" })))
}
