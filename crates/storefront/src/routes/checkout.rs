//! Checkout and payment verification handlers.
//!
//! Checkout freezes the reconciled cart into a pending order and opens a
//! gateway order; verification checks the signature the payment widget posts
//! back, promotes the order to completed and clears the caller's cart. The
//! total is always recomputed server-side from the line snapshots - the
//! client never supplies an amount.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use aroura_core::{Email, OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, AppResult};
use crate::middleware::auth_state;
use crate::models::{NewOrder, ShippingInfo};
use crate::routes::load_cart;
use crate::services::razorpay::PaymentCallback;
use crate::state::AppState;

/// Body for `POST /api/checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    /// Contact email for guest checkout; ignored when logged in.
    pub email: Option<String>,
}

/// Response for `POST /api/checkout`: everything the payment widget needs.
#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub razorpay_order_id: String,
    /// Amount in paise, as the gateway quotes it.
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// Response for `POST /api/payment/verify`.
#[derive(Serialize)]
pub struct VerifyResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// `POST /api/checkout`
#[instrument(skip(state, session, body))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let email = resolve_checkout_email(&session, body.email.as_deref()).await?;

    if body.full_name.trim().is_empty() || body.address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "full name and address are required".to_owned(),
        ));
    }

    let (mut cart_sync, _) = load_cart(&state, &session).await;
    cart_sync.flush().await;
    let cart = cart_sync.collection();
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    let total = cart.summary().total_price;
    let receipt = format!("aroura_{}", Uuid::new_v4().simple());
    let gateway_order = state
        .razorpay()
        .create_order(total, &receipt)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "gateway order creation failed");
            AppError::Payment(e.to_string())
        })?;

    let order = OrderRepository::new(state.pool())
        .create(&NewOrder {
            items: cart.lines().to_vec(),
            total,
            shipping: ShippingInfo {
                full_name: body.full_name,
                address: body.address,
                phone: body.phone,
                email,
            },
            razorpay_order_id: gateway_order.id.clone(),
        })
        .await?;

    tracing::info!(
        order_id = %order.id,
        razorpay_order_id = %gateway_order.id,
        total = %total.display(),
        "checkout opened"
    );

    Ok(Json(CheckoutResponse {
        order_id: order.id,
        razorpay_order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        key_id: state.razorpay().key_id().to_owned(),
    }))
}

/// `POST /api/payment/verify`
///
/// A signature mismatch leaves the order untouched; the widget retries or
/// the order stays pending.
#[instrument(skip(state, session, callback))]
pub async fn verify_payment(
    State(state): State<AppState>,
    session: Session,
    Json(callback): Json<PaymentCallback>,
) -> AppResult<Json<VerifyResponse>> {
    if !state.razorpay().verify_signature(&callback) {
        tracing::warn!(
            razorpay_order_id = %callback.razorpay_order_id,
            "payment signature mismatch"
        );
        return Err(AppError::BadRequest(
            "invalid payment signature".to_owned(),
        ));
    }

    let order = OrderRepository::new(state.pool())
        .mark_completed(&callback.razorpay_order_id)
        .await?;

    // The purchase is done; empty the cart wherever it lives.
    let (mut cart_sync, _) = load_cart(&state, &session).await;
    cart_sync.collection_mut().clear();
    cart_sync.save().await;

    if let Some(mailer) = state.mailer() {
        if let Err(e) = mailer.send_order_confirmation(&order).await {
            tracing::error!(order_id = %order.id, error = %e, "confirmation email failed");
        }
    }

    tracing::info!(order_id = %order.id, "payment verified");

    Ok(Json(VerifyResponse {
        order_id: order.id,
        status: order.status,
    }))
}

/// The order's contact email: the session identity when logged in, the form
/// field for guests.
async fn resolve_checkout_email(
    session: &Session,
    body_email: Option<&str>,
) -> Result<Email, AppError> {
    let auth = auth_state(session).await;
    if let Some(identity) = auth.identity {
        return Ok(identity);
    }
    let raw = body_email
        .ok_or_else(|| AppError::BadRequest("email is required for guest checkout".to_owned()))?;
    Email::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))
}
