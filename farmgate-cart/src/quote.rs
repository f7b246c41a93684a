use crate::models::Cart;
use farmgate_catalog::pricing::{summarize_order, OrderSummary, PricedLine};
use farmgate_catalog::product::Product;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// One cart line priced against a catalog snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteLine {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub reference_price_cents: i64,
    pub line_total_cents: i64,
}

/// A cart priced fresh against the live catalog. Never persisted; a new quote
/// is computed on every cart read and again at order placement.
#[derive(Debug, Clone, Serialize)]
pub struct CartQuote {
    pub customer_id: String,
    pub lines: Vec<QuoteLine>,
    pub summary: OrderSummary,
    /// Cart lines whose product no longer exists or is inactive. Dropped from
    /// pricing, reported here so the caller can surface the condition.
    pub unavailable_product_ids: Vec<Uuid>,
}

/// Price a cart against a `product_id -> Product` snapshot resolved by the
/// caller. Lines pointing at a missing or inactive product are excluded from
/// the totals entirely, not zero-priced.
pub fn build_quote(cart: &Cart, products: &HashMap<Uuid, Product>) -> CartQuote {
    let mut lines = Vec::with_capacity(cart.items.len());
    let mut unavailable = Vec::new();

    for item in &cart.items {
        let product = match products.get(&item.product_id) {
            Some(p) if p.is_active => p,
            _ => {
                unavailable.push(item.product_id);
                continue;
            }
        };

        let unit_price = product.unit_price_for(item.quantity);
        let reference = product
            .original_price_cents
            .filter(|&p| p >= 0)
            .unwrap_or(unit_price);

        lines.push(QuoteLine {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit: product.unit.clone(),
            quantity: item.quantity,
            unit_price_cents: unit_price,
            reference_price_cents: reference,
            line_total_cents: unit_price * item.quantity.max(0) as i64,
        });
    }

    let priced: Vec<PricedLine> = lines
        .iter()
        .map(|l| PricedLine {
            quantity: l.quantity,
            unit_price_cents: Some(l.unit_price_cents),
            reference_price_cents: Some(l.reference_price_cents),
        })
        .collect();

    CartQuote {
        customer_id: cart.customer_id.clone(),
        lines,
        summary: summarize_order(&priced),
        unavailable_product_ids: unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmgate_catalog::pricing::PriceBreak;
    use farmgate_catalog::product::ProductDraft;

    fn product(base: i64, original: Option<i64>, breaks: Vec<PriceBreak>) -> Product {
        ProductDraft {
            sku: "SKU".into(),
            name: "Tomatoes".into(),
            description: None,
            category_id: None,
            base_price_cents: base,
            original_price_cents: original,
            price_breaks: breaks,
            unit: "kg".into(),
            stock_quantity: 1000,
            image_url: None,
            is_active: true,
            is_featured: false,
            metadata: serde_json::json!({}),
        }
        .into_product()
        .unwrap()
    }

    #[test]
    fn quote_applies_tier_pricing_and_savings() {
        let tomatoes = product(
            10000,
            None,
            vec![
                PriceBreak {
                    min_quantity: 5,
                    unit_price_cents: 9500,
                },
                PriceBreak {
                    min_quantity: 10,
                    unit_price_cents: 9000,
                },
            ],
        );
        let honey = product(5000, Some(6000), vec![]);

        let mut cart = Cart::new("cust-1".into());
        cart.add_item(tomatoes.id, 7);
        cart.add_item(honey.id, 1);

        let mut snapshot = HashMap::new();
        snapshot.insert(tomatoes.id, tomatoes);
        snapshot.insert(honey.id, honey);

        let quote = build_quote(&cart, &snapshot);

        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].unit_price_cents, 9500);
        assert_eq!(quote.lines[0].line_total_cents, 66500);
        // Tomatoes carry no original price, so only honey contributes savings.
        assert_eq!(quote.summary.total_cents, 66500 + 5000);
        assert_eq!(quote.summary.subtotal_cents, 66500 + 6000);
        assert_eq!(quote.summary.savings_cents, 1000);
        assert_eq!(quote.summary.item_count, 8);
        assert!(quote.unavailable_product_ids.is_empty());
    }

    #[test]
    fn orphaned_line_dropped_and_reported() {
        let honey = product(5000, None, vec![]);
        let deleted_id = Uuid::new_v4();

        let mut cart = Cart::new("cust-1".into());
        cart.add_item(honey.id, 2);
        cart.add_item(deleted_id, 3);

        let mut snapshot = HashMap::new();
        snapshot.insert(honey.id, honey);

        let quote = build_quote(&cart, &snapshot);

        assert_eq!(quote.lines.len(), 1);
        assert_eq!(quote.summary.total_cents, 10000);
        assert_eq!(quote.summary.item_count, 2);
        assert_eq!(quote.unavailable_product_ids, vec![deleted_id]);
    }

    #[test]
    fn inactive_product_treated_as_unavailable() {
        let mut squash = product(3000, None, vec![]);
        squash.is_active = false;
        let squash_id = squash.id;

        let mut cart = Cart::new("cust-1".into());
        cart.add_item(squash_id, 1);

        let mut snapshot = HashMap::new();
        snapshot.insert(squash_id, squash);

        let quote = build_quote(&cart, &snapshot);

        assert!(quote.lines.is_empty());
        assert_eq!(quote.summary, OrderSummary::default());
        assert_eq!(quote.unavailable_product_ids, vec![squash_id]);
    }

    #[test]
    fn empty_cart_quotes_to_zeros() {
        let cart = Cart::new("cust-1".into());
        let quote = build_quote(&cart, &HashMap::new());
        assert_eq!(quote.summary, OrderSummary::default());
        assert!(quote.lines.is_empty());
    }
}
