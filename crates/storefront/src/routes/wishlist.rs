//! Wishlist handlers.
//!
//! Same shape as the cart handlers: reconcile, mutate through the engine,
//! save.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use aroura_core::{Price, ProductId, WishlistEntry, WishlistToggle};

use crate::commerce::Reconciliation;
use crate::error::{AppError, AppResult};
use crate::routes::load_wishlist;
use crate::state::AppState;

/// Wishlist payload returned by every wishlist handler.
#[derive(Serialize)]
pub struct WishlistResponse {
    pub entries: Vec<WishlistEntry>,
    pub total_value: Price,
    /// Whether the server fetch failed and the wishlist is served read-only.
    pub degraded: bool,
}

impl WishlistResponse {
    fn new(entries: Vec<WishlistEntry>, total_value: Price, outcome: Reconciliation) -> Self {
        Self {
            entries,
            total_value,
            degraded: outcome == Reconciliation::Fallback,
        }
    }
}

/// Body for `POST /api/wishlist/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub product_id: i64,
}

/// Response for `POST /api/wishlist/toggle`.
#[derive(Serialize)]
pub struct ToggleResponse {
    pub result: WishlistToggle,
    #[serde(flatten)]
    pub wishlist: WishlistResponse,
}

/// `GET /api/wishlist`
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<WishlistResponse> {
    let (mut sync, outcome) = load_wishlist(&state, &session).await;
    sync.flush().await;
    Json(WishlistResponse::new(
        sync.collection().entries().to_vec(),
        sync.collection().total_value(),
        outcome,
    ))
}

/// `POST /api/wishlist/toggle`
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ToggleRequest>,
) -> AppResult<Json<ToggleResponse>> {
    let product = state
        .catalog()
        .get(ProductId::new(body.product_id))
        .ok_or_else(|| AppError::BadRequest("unknown product".to_owned()))?;

    let (mut sync, outcome) = load_wishlist(&state, &session).await;
    let result = sync.collection_mut().toggle(product.snapshot());
    sync.save().await;

    Ok(Json(ToggleResponse {
        result,
        wishlist: WishlistResponse::new(
            sync.collection().entries().to_vec(),
            sync.collection().total_value(),
            outcome,
        ),
    }))
}

/// `DELETE /api/wishlist/{product_id}`
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i64>,
) -> Json<WishlistResponse> {
    let (mut sync, outcome) = load_wishlist(&state, &session).await;
    sync.collection_mut().remove(ProductId::new(product_id));
    sync.save().await;

    Json(WishlistResponse::new(
        sync.collection().entries().to_vec(),
        sync.collection().total_value(),
        outcome,
    ))
}

/// `DELETE /api/wishlist`
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Json<WishlistResponse> {
    let (mut sync, outcome) = load_wishlist(&state, &session).await;
    sync.collection_mut().clear();
    sync.save().await;

    Json(WishlistResponse::new(
        Vec::new(),
        Price::ZERO,
        outcome,
    ))
}
