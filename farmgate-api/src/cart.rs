use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use farmgate_cart::quote::{build_quote, CartQuote};
use farmgate_cart::{Cart, Wishlist};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{internal, AppError};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart/{customer_id}", get(get_cart).delete(clear_cart))
        .route("/cart/{customer_id}/items", post(add_item))
        .route(
            "/cart/{customer_id}/items/{product_id}",
            put(set_quantity).delete(remove_item),
        )
        .route("/wishlist/{customer_id}", get(get_wishlist))
        .route(
            "/wishlist/{customer_id}/items/{product_id}",
            post(wishlist_add).delete(wishlist_remove),
        )
}

/// Price a cart against the live catalog. Lines whose product has vanished or
/// gone inactive are dropped from totals and reported, never crash the view.
pub async fn priced_view(state: &AppState, cart: &Cart) -> Result<CartQuote, AppError> {
    let ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
    let products = state.products.get_products(&ids).await.map_err(internal)?;

    let snapshot: HashMap<Uuid, farmgate_catalog::Product> =
        products.into_iter().map(|p| (p.id, p)).collect();

    let quote = build_quote(cart, &snapshot);
    if !quote.unavailable_product_ids.is_empty() {
        tracing::warn!(
            customer_id = %cart.customer_id,
            unavailable = ?quote.unavailable_product_ids,
            "cart references unavailable products"
        );
    }
    Ok(quote)
}

async fn load_or_new_cart(state: &AppState, customer_id: &str) -> Result<Cart, AppError> {
    Ok(state
        .carts
        .get_cart(customer_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| Cart::new(customer_id.to_string())))
}

/// GET /api/v1/cart/{customer_id}
async fn get_cart(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CartQuote>, AppError> {
    let cart = load_or_new_cart(&state, &customer_id).await?;
    let quote = priced_view(&state, &cart).await?;
    Ok(Json(quote))
}

/// POST /api/v1/cart/{customer_id}/items
/// Merge-add a line; validates the product exists and is active.
async fn add_item(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartQuote>, AppError> {
    if req.quantity <= 0 {
        return Err(AppError::ValidationError(
            "quantity must be positive".into(),
        ));
    }

    let product = state
        .products
        .get_product(req.product_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            AppError::NotFoundError(format!("product {} not found", req.product_id))
        })?;

    if !product.is_active {
        return Err(AppError::ValidationError(format!(
            "product {} is not available",
            req.product_id
        )));
    }

    let mut cart = load_or_new_cart(&state, &customer_id).await?;
    cart.add_item(req.product_id, req.quantity);
    state.carts.save_cart(&cart).await.map_err(internal)?;

    let quote = priced_view(&state, &cart).await?;
    Ok(Json(quote))
}

/// PUT /api/v1/cart/{customer_id}/items/{product_id}
/// Set a line's quantity; zero or negative removes the line.
async fn set_quantity(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(String, Uuid)>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<CartQuote>, AppError> {
    let mut cart = load_or_new_cart(&state, &customer_id).await?;
    cart.set_quantity(product_id, req.quantity);
    state.carts.save_cart(&cart).await.map_err(internal)?;

    let quote = priced_view(&state, &cart).await?;
    Ok(Json(quote))
}

/// DELETE /api/v1/cart/{customer_id}/items/{product_id}
async fn remove_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(String, Uuid)>,
) -> Result<Json<CartQuote>, AppError> {
    let mut cart = load_or_new_cart(&state, &customer_id).await?;
    cart.remove_item(product_id);
    state.carts.save_cart(&cart).await.map_err(internal)?;

    let quote = priced_view(&state, &cart).await?;
    Ok(Json(quote))
}

/// DELETE /api/v1/cart/{customer_id}
async fn clear_cart(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.carts.delete_cart(&customer_id).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/wishlist/{customer_id}
async fn get_wishlist(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Wishlist>, AppError> {
    let wishlist = state
        .wishlists
        .get_wishlist(&customer_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| Wishlist::new(customer_id));
    Ok(Json(wishlist))
}

/// POST /api/v1/wishlist/{customer_id}/items/{product_id}
async fn wishlist_add(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(String, Uuid)>,
) -> Result<Json<Wishlist>, AppError> {
    state
        .products
        .get_product(product_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("product {product_id} not found")))?;

    let mut wishlist = state
        .wishlists
        .get_wishlist(&customer_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| Wishlist::new(customer_id));

    wishlist.add(product_id);
    state
        .wishlists
        .save_wishlist(&wishlist)
        .await
        .map_err(internal)?;

    Ok(Json(wishlist))
}

/// DELETE /api/v1/wishlist/{customer_id}/items/{product_id}
async fn wishlist_remove(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(String, Uuid)>,
) -> Result<Json<Wishlist>, AppError> {
    let mut wishlist = state
        .wishlists
        .get_wishlist(&customer_id)
        .await
        .map_err(internal)?
        .unwrap_or_else(|| Wishlist::new(customer_id));

    wishlist.remove(product_id);
    state
        .wishlists
        .save_wishlist(&wishlist)
        .await
        .map_err(internal)?;

    Ok(Json(wishlist))
}
