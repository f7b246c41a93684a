use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use farmgate_order::Order;
use uuid::Uuid;

use crate::error::{internal, AppError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}", get(get_order))
        .route("/customers/{customer_id}/orders", get(customer_orders))
}

/// GET /api/v1/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("order {id} not found")))?;

    Ok(Json(order))
}

/// GET /api/v1/customers/{customer_id}/orders
/// Order history, newest first. Totals come back exactly as persisted at
/// placement time; they are never recomputed against today's catalog.
async fn customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state
        .orders
        .list_orders_for_customer(&customer_id)
        .await
        .map_err(internal)?;

    Ok(Json(orders))
}
