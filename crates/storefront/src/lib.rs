//! Aroura storefront library.
//!
//! The storefront as a library: reconciliation engine, store adapters,
//! catalog, payment gateway client, repositories and routes. The binary in
//! `main.rs` only wires configuration, the pool and the router together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod commerce;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use state::AppState;

/// Assemble the full application router.
pub fn build_router(
    state: AppState,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::health_ready))
        .nest("/api/products", routes::product_routes())
        .nest("/api/cart", routes::cart_routes())
        .nest("/api/wishlist", routes::wishlist_routes())
        .nest(
            "/api/auth",
            routes::auth_routes().layer(middleware::auth_rate_limiter()),
        )
        .nest("/api/orders", routes::order_routes())
        .route(
            "/api/checkout",
            axum::routing::post(routes::checkout::checkout)
                .layer(middleware::payment_rate_limiter()),
        )
        .route(
            "/api/payment/verify",
            axum::routing::post(routes::checkout::verify_payment)
                .layer(middleware::payment_rate_limiter()),
        )
        .layer(session_layer)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Sentry layers outermost for full request coverage
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
