//! Order history and cancellation handlers. Both require a logged-in user.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use aroura_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, AppResult};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::state::AppState;

/// Response for `GET /api/orders`.
#[derive(Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

/// `GET /api/orders`
///
/// Completed orders only, newest first. Pending and failed orders are
/// internal bookkeeping and never shown.
#[instrument(skip(state, user), fields(identity = %user.email))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<OrdersResponse>> {
    let orders = OrderRepository::new(state.pool())
        .list_completed(&user.email)
        .await?;
    Ok(Json(OrdersResponse { orders }))
}

/// `POST /api/orders/{id}/cancel`
///
/// Only the owning identity may cancel; cancelling twice is a 400.
#[instrument(skip(state, user), fields(identity = %user.email))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let id = OrderId::from(id);

    let order = repo.get(id).await?.ok_or(AppError::NotFound)?;

    if order.shipping.email != user.email {
        return Err(AppError::Forbidden);
    }
    if order.status == OrderStatus::Cancelled {
        return Err(AppError::BadRequest("order is already cancelled".to_owned()));
    }

    let cancelled = repo.cancel(id).await?;

    if let Some(mailer) = state.mailer() {
        if let Err(e) = mailer.send_order_cancelled(&cancelled).await {
            tracing::error!(order_id = %cancelled.id, error = %e, "cancellation email failed");
        }
    }

    tracing::info!(order_id = %cancelled.id, "order cancelled");
    Ok(Json(cancelled))
}
