//! Cart handlers.
//!
//! Each handler reconciles the caller's cart first, applies its mutation
//! through the engine, then saves. Read handlers flush instead, so a
//! migration triggered by the read is promoted to the server immediately.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use aroura_core::{AddToCart, CartLine, CartSummary, DeliveryOption, LineId, PrintSize, ProductId};

use crate::commerce::Reconciliation;
use crate::error::{AppError, AppResult};
use crate::routes::load_cart;
use crate::state::AppState;

/// Cart payload returned by every cart handler.
#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub summary: CartSummary,
    /// Whether the server fetch failed and the cart is served read-only.
    pub degraded: bool,
}

impl CartResponse {
    fn new(items: Vec<CartLine>, summary: CartSummary, outcome: Reconciliation) -> Self {
        Self {
            items,
            summary,
            degraded: outcome == Reconciliation::Fallback,
        }
    }
}

/// Body for `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub selected_size: PrintSize,
    #[serde(default)]
    pub delivery_option: DeliveryOption,
}

const fn default_quantity() -> u32 {
    1
}

/// Body for `PATCH /api/cart/items/{line_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

/// `GET /api/cart`
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartResponse> {
    let (mut sync, outcome) = load_cart(&state, &session).await;
    sync.flush().await;
    Json(CartResponse::new(
        sync.collection().lines().to_vec(),
        sync.collection().summary(),
        outcome,
    ))
}

/// `POST /api/cart/items`
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemRequest>,
) -> AppResult<(StatusCode, Json<CartResponse>)> {
    let product = state
        .catalog()
        .get(ProductId::new(body.product_id))
        .ok_or_else(|| AppError::BadRequest("unknown product".to_owned()))?;

    let (mut sync, outcome) = load_cart(&state, &session).await;
    sync.collection_mut().add(
        product.snapshot(),
        AddToCart {
            quantity: body.quantity,
            selected_size: body.selected_size,
            delivery_option: body.delivery_option,
        },
    );
    sync.save().await;

    Ok((
        StatusCode::CREATED,
        Json(CartResponse::new(
            sync.collection().lines().to_vec(),
            sync.collection().summary(),
            outcome,
        )),
    ))
}

/// `PATCH /api/cart/items/{line_id}`
#[instrument(skip(state, session))]
pub async fn update_quantity(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> Json<CartResponse> {
    let (mut sync, outcome) = load_cart(&state, &session).await;
    sync.collection_mut()
        .update_quantity(LineId::from(line_id), body.quantity);
    sync.save().await;

    Json(CartResponse::new(
        sync.collection().lines().to_vec(),
        sync.collection().summary(),
        outcome,
    ))
}

/// `DELETE /api/cart/items/{line_id}`
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<Uuid>,
) -> Json<CartResponse> {
    let (mut sync, outcome) = load_cart(&state, &session).await;
    sync.collection_mut().remove(LineId::from(line_id));
    sync.save().await;

    Json(CartResponse::new(
        sync.collection().lines().to_vec(),
        sync.collection().summary(),
        outcome,
    ))
}

/// `DELETE /api/cart`
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Json<CartResponse> {
    let (mut sync, outcome) = load_cart(&state, &session).await;
    sync.collection_mut().clear();
    sync.save().await;

    Json(CartResponse::new(
        Vec::new(),
        sync.collection().summary(),
        outcome,
    ))
}
