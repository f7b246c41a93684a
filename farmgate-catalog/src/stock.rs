use crate::product::Product;

#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("Product is not available for sale: {0}")]
    Unavailable(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    Insufficient { requested: i32, available: i32 },
}

/// Check that `requested` units of a product can be sold right now.
/// Inactive products are never available, whatever their stock level.
pub fn check_availability(product: &Product, requested: i32) -> Result<(), StockError> {
    if !product.is_active {
        return Err(StockError::Unavailable(product.sku.clone()));
    }
    if requested > product.stock_quantity {
        return Err(StockError::Insufficient {
            requested,
            available: product.stock_quantity,
        });
    }
    Ok(())
}

/// Stock level after deducting a sale. Clamped at zero so a concurrent
/// oversell cannot drive the stored quantity negative.
pub fn deduct(stock_quantity: i32, sold: i32) -> i32 {
    stock_quantity.saturating_sub(sold.max(0)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductDraft;

    fn product(stock: i32, active: bool) -> Product {
        let mut p = ProductDraft {
            sku: "EGG-TRAY".into(),
            name: "Egg Tray".into(),
            description: None,
            category_id: None,
            base_price_cents: 1200,
            original_price_cents: None,
            price_breaks: vec![],
            unit: "tray".into(),
            stock_quantity: stock,
            image_url: None,
            is_active: active,
            is_featured: false,
            metadata: serde_json::json!({}),
        }
        .into_product()
        .unwrap();
        p.is_active = active;
        p
    }

    #[test]
    fn available_when_stock_covers_request() {
        assert!(check_availability(&product(10, true), 10).is_ok());
    }

    #[test]
    fn insufficient_stock_reports_quantities() {
        let err = check_availability(&product(3, true), 5).unwrap_err();
        match err {
            StockError::Insufficient {
                requested,
                available,
            } => {
                assert_eq!(requested, 5);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inactive_product_unavailable() {
        assert!(matches!(
            check_availability(&product(100, false), 1),
            Err(StockError::Unavailable(_))
        ));
    }

    #[test]
    fn deduction_clamps_at_zero() {
        assert_eq!(deduct(10, 4), 6);
        assert_eq!(deduct(3, 5), 0);
        assert_eq!(deduct(3, -2), 3);
    }
}
