use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use farmgate_catalog::pricing::{discount_percent, resolve_unit_price, PriceBreak};
use farmgate_catalog::Product;
use farmgate_core::repository::ProductFilter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{internal, AppError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<Uuid>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// A catalog product as rendered to the storefront: stored fields plus the
/// derived single-unit display price and discount percentage.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub base_price_cents: i64,
    pub original_price_cents: Option<i64>,
    pub price_breaks: Vec<PriceBreak>,
    pub display_price_cents: i64,
    pub discount_percent: i32,
    pub unit: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let display_price_cents = p.unit_price_for(1);
        let discount_percent = p.display_discount_percent();
        Self {
            id: p.id,
            sku: p.sku,
            name: p.name,
            description: p.description,
            category_id: p.category_id,
            base_price_cents: p.base_price_cents,
            original_price_cents: p.original_price_cents,
            price_breaks: p.price_breaks,
            display_price_cents,
            discount_percent,
            unit: p.unit,
            stock_quantity: p.stock_quantity,
            image_url: p.image_url,
            is_active: p.is_active,
            is_featured: p.is_featured,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PriceQuoteResponse {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub base_price_cents: i64,
    pub discount_percent: i32,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/price", get(price_quote))
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category))
}

/// GET /api/v1/products
/// Active products only, filterable by category and name substring.
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<ProductResponse>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(state.storefront.page_size)
        .clamp(1, 100);

    let filter = ProductFilter {
        category_id: params.category,
        search: params.search,
        include_inactive: false,
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

/// GET /api/v1/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .products
        .get_product(id)
        .await
        .map_err(internal)?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFoundError(format!("product {id} not found")))?;

    Ok(Json(ProductResponse::from(product)))
}

/// GET /api/v1/products/{id}/price?quantity=N
/// The tier resolver exposed for display. A missing or non-positive quantity
/// falls back to base pricing rather than erroring.
async fn price_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PriceParams>,
) -> Result<Json<PriceQuoteResponse>, AppError> {
    let product = state
        .products
        .get_product(id)
        .await
        .map_err(internal)?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFoundError(format!("product {id} not found")))?;

    let quantity = params.quantity.unwrap_or(1);
    let unit_price_cents =
        resolve_unit_price(product.base_price_cents, &product.price_breaks, quantity);

    Ok(Json(PriceQuoteResponse {
        product_id: product.id,
        quantity,
        unit_price_cents,
        line_total_cents: unit_price_cents * quantity.max(1) as i64,
        base_price_cents: product.base_price_cents,
        discount_percent: product
            .original_price_cents
            .map(|original| discount_percent(original, unit_price_cents))
            .unwrap_or(0),
    }))
}

/// GET /api/v1/categories
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<farmgate_catalog::Category>>, AppError> {
    let categories = state.categories.list_categories().await.map_err(internal)?;
    Ok(Json(categories))
}

/// GET /api/v1/categories/{id}
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<farmgate_catalog::Category>, AppError> {
    let category = state
        .categories
        .get_category(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("category {id} not found")))?;

    Ok(Json(category))
}
