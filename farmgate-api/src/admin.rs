use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use farmgate_catalog::{Category, ProductDraft, ProductPatch};
use farmgate_order::{Order, OrderStatus};
use farmgate_shared::models::events::{
    OrderStatusChangedEvent, ProductCreatedEvent, ProductDeletedEvent, ProductUpdatedEvent,
    StorefrontEvent,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{ListParams, Paginated, ProductResponse};
use crate::error::{internal, AppError};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/categories", post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", put(update_order_status))
}

/// GET /api/v1/admin/products
/// Back-office listing: includes inactive products.
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<ProductResponse>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(state.storefront.page_size)
        .clamp(1, 100);

    let filter = farmgate_core::repository::ProductFilter {
        category_id: params.category,
        search: params.search,
        include_inactive: true,
        page,
        per_page,
    };

    let (products, total) = state
        .products
        .list_products(&filter)
        .await
        .map_err(internal)?;

    Ok(Json(Paginated {
        data: products.into_iter().map(ProductResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// POST /api/v1/admin/products
async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let product = draft
        .into_product()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .products
        .create_product(&product)
        .await
        .map_err(internal)?;

    state
        .events
        .publish(StorefrontEvent::ProductCreated(ProductCreatedEvent {
            product_id: product.id,
            sku: product.sku.clone(),
            timestamp: Utc::now().timestamp(),
        }));

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// PUT /api/v1/admin/products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductResponse>, AppError> {
    let mut product = state
        .products
        .get_product(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("product {id} not found")))?;

    patch
        .apply_to(&mut product)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .products
        .update_product(&product)
        .await
        .map_err(internal)?;

    state
        .events
        .publish(StorefrontEvent::ProductUpdated(ProductUpdatedEvent {
            product_id: product.id,
            timestamp: Utc::now().timestamp(),
        }));

    Ok(Json(ProductResponse::from(product)))
}

/// DELETE /api/v1/admin/products/{id}
/// Hard delete. Cart lines still pointing here become orphaned references
/// and are dropped at quote time.
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.products.delete_product(id).await.map_err(internal)?;
    if !deleted {
        return Err(AppError::NotFoundError(format!("product {id} not found")));
    }

    state
        .events
        .publish(StorefrontEvent::ProductDeleted(ProductDeletedEvent {
            product_id: id,
            timestamp: Utc::now().timestamp(),
        }));

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/categories
async fn create_category(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    if draft.name.trim().is_empty() || draft.slug.trim().is_empty() {
        return Err(AppError::ValidationError(
            "category name and slug are required".into(),
        ));
    }

    let category = Category {
        id: Uuid::new_v4(),
        name: draft.name,
        slug: draft.slug,
        description: draft.description,
        image_url: draft.image_url,
        created_at: Utc::now(),
    };

    state
        .categories
        .create_category(&category)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/admin/categories/{id}
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, AppError> {
    let mut category = state
        .categories
        .get_category(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("category {id} not found")))?;

    if let Some(name) = patch.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("category name is required".into()));
        }
        category.name = name;
    }
    if let Some(slug) = patch.slug {
        if slug.trim().is_empty() {
            return Err(AppError::ValidationError("category slug is required".into()));
        }
        category.slug = slug;
    }
    if let Some(description) = patch.description {
        category.description = description;
    }
    if let Some(image_url) = patch.image_url {
        category.image_url = image_url;
    }

    state
        .categories
        .update_category(&category)
        .await
        .map_err(internal)?;

    Ok(Json(category))
}

/// DELETE /api/v1/admin/categories/{id}
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .categories
        .delete_category(id)
        .await
        .map_err(internal)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("category {id} not found")))
    }
}

/// GET /api/v1/admin/orders
async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Paginated<Order>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(state.storefront.page_size)
        .clamp(1, 100);

    let (orders, total) = state
        .orders
        .list_orders(page, per_page)
        .await
        .map_err(internal)?;

    Ok(Json(Paginated {
        data: orders,
        total,
        page,
        per_page,
    }))
}

/// PUT /api/v1/admin/orders/{id}/status
/// Guarded lifecycle transition; an illegal jump is a 409, not a silent write.
async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, AppError> {
    let mut order = state
        .orders
        .get_order(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("order {id} not found")))?;

    let from = order.status;
    order
        .update_status(req.status)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;

    state
        .orders
        .update_order_status(id, order.status)
        .await
        .map_err(internal)?;

    state
        .events
        .publish(StorefrontEvent::OrderStatusChanged(OrderStatusChangedEvent {
            order_id: id,
            from_status: from.to_string(),
            to_status: order.status.to_string(),
            timestamp: Utc::now().timestamp(),
        }));

    Ok(Json(order))
}
