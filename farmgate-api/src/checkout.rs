use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use farmgate_cart::quote::CartQuote;
use farmgate_catalog::stock::{check_availability, deduct, StockError};
use farmgate_order::Order;
use farmgate_shared::models::events::{OrderPlacedEvent, StorefrontEvent};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{internal, AppError};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub customer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub customer_email: String,
    #[serde(default)]
    pub shipping_address: serde_json::Value,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/quote", post(quote))
        .route("/checkout", post(place_order))
}

/// POST /api/v1/checkout/quote
/// Priced preview of the current cart. No mutation.
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<CartQuote>, AppError> {
    let cart = state
        .carts
        .get_cart(&req.customer_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| farmgate_cart::Cart::new(req.customer_id.clone()));

    let quote = crate::cart::priced_view(&state, &cart).await?;
    Ok(Json(quote))
}

/// POST /api/v1/checkout
/// Place an order: price the cart fresh against the live catalog, snapshot
/// the totals, persist, deduct stock, clear the cart, publish the event.
async fn place_order(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    if !req.customer_email.contains('@') {
        return Err(AppError::ValidationError(
            "a valid customer email is required".into(),
        ));
    }

    // 1. Load the cart; an absent or empty cart cannot be checked out.
    let cart = state
        .carts
        .get_cart(&req.customer_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::ValidationError("cart is empty".into()))?;

    // 2. Price against the live catalog. Orphaned lines are dropped here.
    let quote = crate::cart::priced_view(&state, &cart).await?;
    if quote.lines.is_empty() {
        return Err(AppError::ValidationError(
            "no purchasable items in cart".into(),
        ));
    }

    // 3. Verify stock covers every surviving line.
    let ids: Vec<Uuid> = quote.lines.iter().map(|l| l.product_id).collect();
    let products = state.products.get_products(&ids).await.map_err(internal)?;
    for line in &quote.lines {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| AppError::ConflictError(format!(
                "product {} is no longer available",
                line.product_id
            )))?;

        check_availability(product, line.quantity).map_err(|e| match e {
            StockError::Insufficient { .. } => {
                AppError::ConflictError(format!("{} for {}", e, product.name))
            }
            StockError::Unavailable(_) => AppError::ConflictError(e.to_string()),
        })?;
    }

    // 4. Snapshot totals into an order and persist it.
    let order = Order::from_quote(
        &quote,
        req.customer_email,
        req.shipping_address,
        state.storefront.currency.clone(),
    )
    .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.orders.create_order(&order).await.map_err(internal)?;

    // 5. Deduct stock, clear the cart.
    for line in &quote.lines {
        if let Some(product) = products.iter().find(|p| p.id == line.product_id) {
            let remaining = deduct(product.stock_quantity, line.quantity);
            state
                .products
                .set_stock(product.id, remaining)
                .await
                .map_err(internal)?;
        }
    }
    state
        .carts
        .delete_cart(&req.customer_id)
        .await
        .map_err(internal)?;

    state
        .events
        .publish(StorefrontEvent::OrderPlaced(OrderPlacedEvent {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.clone(),
            total_cents: order.total_cents,
            item_count: order.item_count,
            timestamp: Utc::now().timestamp(),
        }));

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total_cents = order.total_cents,
        "order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}
