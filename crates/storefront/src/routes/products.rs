//! Product catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aroura_core::ProductId;

use crate::catalog::{Product, SortOrder};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Product listing response.
#[derive(Serialize)]
pub struct ListResponse<'a> {
    pub products: Vec<&'a Product>,
    pub categories: Vec<&'a str>,
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListResponse<'static>> {
    let catalog = state.catalog();
    Json(ListResponse {
        products: catalog.list(params.category.as_deref(), params.sort),
        categories: catalog.categories(),
    })
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<&'static Product>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(Json)
        .ok_or(AppError::NotFound)
}
