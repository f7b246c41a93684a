use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderPlacedEvent {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_id: String,
    pub total_cents: i64,
    pub item_count: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ProductCreatedEvent {
    pub product_id: Uuid,
    pub sku: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ProductUpdatedEvent {
    pub product_id: Uuid,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ProductDeletedEvent {
    pub product_id: Uuid,
    pub timestamp: i64,
}

/// Everything published on the in-process storefront bus.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorefrontEvent {
    OrderPlaced(OrderPlacedEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
    ProductCreated(ProductCreatedEvent),
    ProductUpdated(ProductUpdatedEvent),
    ProductDeleted(ProductDeletedEvent),
}
