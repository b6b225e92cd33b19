//! Auth handlers.
//!
//! Identity verification happens upstream; these endpoints only store and
//! clear a validated email in the session.
//! Cart and wishlist reconciliation happens on the next collection read, not
//! here - login does not touch either store.

use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use aroura_core::Email;

use crate::error::{AppError, AppResult};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;

/// Body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Identity payload.
#[derive(Serialize)]
pub struct IdentityResponse {
    pub email: Option<Email>,
}

/// `POST /api/auth/login`
#[instrument(skip(session, body))]
pub async fn login(
    session: Session,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<IdentityResponse>> {
    let email =
        Email::parse(&body.email).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let user = CurrentUser {
        email: email.clone(),
    };
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(identity = %email, "login");
    Ok(Json(IdentityResponse { email: Some(email) }))
}

/// `POST /api/auth/logout`
#[instrument(skip(session))]
pub async fn logout(session: Session) -> AppResult<Json<IdentityResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    Ok(Json(IdentityResponse { email: None }))
}

/// `GET /api/auth/me`
#[instrument(skip(user))]
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        email: user.map(|u| u.email),
    })
}
