use crate::status::{OrderError, OrderStatus};
use chrono::{DateTime, Utc};
use farmgate_cart::quote::CartQuote;
use farmgate_shared::pii::Masked;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single source of truth for a customer's purchase. Totals are a
/// snapshot taken at placement time and never recomputed afterwards, even if
/// catalog prices change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: String,
    pub customer_email: Masked<String>,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub savings_cents: i64,
    pub total_cents: i64,
    pub item_count: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub shipping_address: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An individual product line within an order, with the unit price frozen at
/// placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub unit: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl Order {
    /// Assemble a pending order from a freshly priced cart quote. The quote
    /// must already have orphaned lines dropped; an empty quote is rejected
    /// rather than producing a zero-total order.
    pub fn from_quote(
        quote: &CartQuote,
        customer_email: String,
        shipping_address: serde_json::Value,
        currency: String,
    ) -> Result<Self, OrderError> {
        if quote.lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let order_id = Uuid::new_v4();
        let now = Utc::now();

        let items = quote
            .lines
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                name: line.name.clone(),
                unit: line.unit.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                line_total_cents: line.line_total_cents,
            })
            .collect();

        Ok(Self {
            id: order_id,
            order_number: generate_order_number(),
            customer_id: quote.customer_id.clone(),
            customer_email: Masked(customer_email),
            items,
            subtotal_cents: quote.summary.subtotal_cents,
            savings_cents: quote.summary.savings_cents,
            total_cents: quote.summary.total_cents,
            item_count: quote.summary.item_count,
            currency,
            status: OrderStatus::Pending,
            shipping_address,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_status(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        self.status = self.status.transition_to(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Human-readable order reference: "FG-" plus 8 random digits.
pub fn generate_order_number() -> String {
    let mut rng = rand::thread_rng();
    format!("FG-{:08}", rng.gen_range(0..100_000_000u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmgate_cart::models::Cart;
    use farmgate_cart::quote::build_quote;
    use farmgate_catalog::pricing::PriceBreak;
    use farmgate_catalog::product::{Product, ProductDraft};
    use std::collections::HashMap;

    fn product() -> Product {
        ProductDraft {
            sku: "YAM-TUBER".into(),
            name: "Yam Tuber".into(),
            description: None,
            category_id: None,
            base_price_cents: 800,
            original_price_cents: Some(1000),
            price_breaks: vec![PriceBreak {
                min_quantity: 10,
                unit_price_cents: 700,
            }],
            unit: "tuber".into(),
            stock_quantity: 500,
            image_url: None,
            is_active: true,
            is_featured: false,
            metadata: serde_json::json!({}),
        }
        .into_product()
        .unwrap()
    }

    fn quote_for(quantity: i32) -> CartQuote {
        let yam = product();
        let mut cart = Cart::new("cust-9".into());
        cart.add_item(yam.id, quantity);
        let mut snapshot = HashMap::new();
        snapshot.insert(yam.id, yam);
        build_quote(&cart, &snapshot)
    }

    #[test]
    fn order_snapshots_quote_totals() {
        let quote = quote_for(12);
        let order = Order::from_quote(
            &quote,
            "buyer@example.com".into(),
            serde_json::json!({"city": "Springfield"}),
            "USD".into(),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].unit_price_cents, 700);
        assert_eq!(order.total_cents, 8400);
        assert_eq!(order.subtotal_cents, 12000);
        assert_eq!(order.savings_cents, 3600);
        assert_eq!(order.item_count, 12);
        assert!(order.order_number.starts_with("FG-"));
        assert_eq!(order.order_number.len(), 11);
    }

    #[test]
    fn empty_quote_rejected() {
        let cart = Cart::new("cust-9".into());
        let quote = build_quote(&cart, &HashMap::new());
        let result = Order::from_quote(
            &quote,
            "buyer@example.com".into(),
            serde_json::json!({}),
            "USD".into(),
        );
        assert!(matches!(result, Err(OrderError::EmptyOrder)));
    }

    #[test]
    fn status_updates_go_through_the_guard() {
        let quote = quote_for(1);
        let mut order = Order::from_quote(
            &quote,
            "buyer@example.com".into(),
            serde_json::json!({}),
            "USD".into(),
        )
        .unwrap();

        order.update_status(OrderStatus::Processing).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(order.update_status(OrderStatus::Delivered).is_err());
        // Failed transition leaves status untouched.
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn email_is_masked_in_debug_output() {
        let quote = quote_for(1);
        let order = Order::from_quote(
            &quote,
            "buyer@example.com".into(),
            serde_json::json!({}),
            "USD".into(),
        )
        .unwrap();

        let debug = format!("{:?}", order);
        assert!(!debug.contains("buyer@example.com"));
    }
}
