use crate::pricing::{discount_percent, resolve_unit_price, PriceBreak};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A catalog product. Pricing fields are read as an immutable snapshot by the
/// pricing core; all mutation happens through catalog management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub base_price_cents: i64,
    /// Pre-discount list price, used only to derive a display discount.
    pub original_price_cents: Option<i64>,
    pub price_breaks: Vec<PriceBreak>,
    /// Selling unit: "kg", "crate", "bag", ...
    pub unit: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Effective unit price for `quantity` units of this product.
    pub fn unit_price_for(&self, quantity: i32) -> i64 {
        resolve_unit_price(self.base_price_cents, &self.price_breaks, quantity)
    }

    /// The price savings are measured against: the original list price when
    /// set, else the resolved unit price itself.
    pub fn reference_price_cents(&self) -> i64 {
        self.original_price_cents
            .unwrap_or(self.base_price_cents)
            .max(0)
    }

    /// Display discount off the original price, for a single unit.
    pub fn display_discount_percent(&self) -> i32 {
        match self.original_price_cents {
            Some(original) => discount_percent(original, self.unit_price_for(1)),
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product via the admin back-office.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub base_price_cents: i64,
    pub original_price_cents: Option<i64>,
    #[serde(default)]
    pub price_breaks: Vec<PriceBreak>,
    pub unit: String,
    #[serde(default)]
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
}

fn default_true() -> bool {
    true
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation("product name is required".into()));
        }
        if self.sku.trim().is_empty() {
            return Err(CatalogError::Validation("product sku is required".into()));
        }
        if self.unit.trim().is_empty() {
            return Err(CatalogError::Validation("selling unit is required".into()));
        }
        if self.base_price_cents < 0 {
            return Err(CatalogError::Validation(
                "base price must be non-negative".into(),
            ));
        }
        if matches!(self.original_price_cents, Some(p) if p < 0) {
            return Err(CatalogError::Validation(
                "original price must be non-negative".into(),
            ));
        }
        if self.stock_quantity < 0 {
            return Err(CatalogError::Validation(
                "stock quantity must be non-negative".into(),
            ));
        }
        validate_price_breaks(&self.price_breaks)
    }

    pub fn into_product(self) -> Result<Product, CatalogError> {
        self.validate()?;
        let now = Utc::now();
        Ok(Product {
            id: Uuid::new_v4(),
            sku: self.sku,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            base_price_cents: self.base_price_cents,
            original_price_cents: self.original_price_cents,
            price_breaks: self.price_breaks,
            unit: self.unit,
            stock_quantity: self.stock_quantity,
            image_url: self.image_url,
            is_active: self.is_active,
            is_featured: self.is_featured,
            metadata: self.metadata,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update payload; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub base_price_cents: Option<i64>,
    pub original_price_cents: Option<Option<i64>>,
    pub price_breaks: Option<Vec<PriceBreak>>,
    pub unit: Option<String>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}

impl ProductPatch {
    /// Apply this patch to a product, re-validating the result.
    pub fn apply_to(self, product: &mut Product) -> Result<(), CatalogError> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(CatalogError::Validation("product name is required".into()));
            }
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(price) = self.base_price_cents {
            if price < 0 {
                return Err(CatalogError::Validation(
                    "base price must be non-negative".into(),
                ));
            }
            product.base_price_cents = price;
        }
        if let Some(original) = self.original_price_cents {
            if matches!(original, Some(p) if p < 0) {
                return Err(CatalogError::Validation(
                    "original price must be non-negative".into(),
                ));
            }
            product.original_price_cents = original;
        }
        if let Some(breaks) = self.price_breaks {
            validate_price_breaks(&breaks)?;
            product.price_breaks = breaks;
        }
        if let Some(unit) = self.unit {
            if unit.trim().is_empty() {
                return Err(CatalogError::Validation("selling unit is required".into()));
            }
            product.unit = unit;
        }
        if let Some(stock) = self.stock_quantity {
            if stock < 0 {
                return Err(CatalogError::Validation(
                    "stock quantity must be non-negative".into(),
                ));
            }
            product.stock_quantity = stock;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }
        if let Some(is_featured) = self.is_featured {
            product.is_featured = is_featured;
        }
        if let Some(metadata) = self.metadata {
            product.metadata = metadata;
        }
        product.updated_at = Utc::now();
        Ok(())
    }
}

/// Duplicate `min_quantity` thresholds make tier selection ambiguous, so they
/// are rejected here at data entry rather than special-cased at read time.
fn validate_price_breaks(breaks: &[PriceBreak]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for b in breaks {
        if b.min_quantity < 1 {
            return Err(CatalogError::Validation(format!(
                "price break min_quantity must be at least 1, got {}",
                b.min_quantity
            )));
        }
        if b.unit_price_cents < 0 {
            return Err(CatalogError::Validation(
                "price break unit price must be non-negative".into(),
            ));
        }
        if !seen.insert(b.min_quantity) {
            return Err(CatalogError::Validation(format!(
                "duplicate price break threshold {}",
                b.min_quantity
            )));
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            sku: "CARROT-5KG".into(),
            name: "Carrots".into(),
            description: None,
            category_id: None,
            base_price_cents: 450,
            original_price_cents: Some(500),
            price_breaks: vec![
                PriceBreak {
                    min_quantity: 10,
                    unit_price_cents: 400,
                },
                PriceBreak {
                    min_quantity: 50,
                    unit_price_cents: 350,
                },
            ],
            unit: "kg".into(),
            stock_quantity: 200,
            image_url: None,
            is_active: true,
            is_featured: false,
            metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn valid_draft_becomes_product() {
        let product = draft().into_product().unwrap();
        assert_eq!(product.sku, "CARROT-5KG");
        assert_eq!(product.unit_price_for(10), 400);
        assert_eq!(product.display_discount_percent(), 10);
    }

    #[test]
    fn duplicate_thresholds_rejected() {
        let mut d = draft();
        d.price_breaks.push(PriceBreak {
            min_quantity: 10,
            unit_price_cents: 390,
        });
        assert!(matches!(d.validate(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut d = draft();
        d.price_breaks[0].min_quantity = 0;
        assert!(d.validate().is_err());
    }

    #[test]
    fn negative_prices_rejected() {
        let mut d = draft();
        d.base_price_cents = -1;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.original_price_cents = Some(-1);
        assert!(d.validate().is_err());

        let mut d = draft();
        d.price_breaks[0].unit_price_cents = -1;
        assert!(d.validate().is_err());
    }

    #[test]
    fn blank_name_rejected() {
        let mut d = draft();
        d.name = "  ".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn patch_revalidates_breaks() {
        let mut product = draft().into_product().unwrap();
        let patch = ProductPatch {
            price_breaks: Some(vec![
                PriceBreak {
                    min_quantity: 5,
                    unit_price_cents: 420,
                },
                PriceBreak {
                    min_quantity: 5,
                    unit_price_cents: 410,
                },
            ]),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut product).is_err());
    }

    #[test]
    fn patch_updates_fields() {
        let mut product = draft().into_product().unwrap();
        let patch = ProductPatch {
            name: Some("Organic Carrots".into()),
            base_price_cents: Some(475),
            is_active: Some(false),
            ..Default::default()
        };
        patch.apply_to(&mut product).unwrap();
        assert_eq!(product.name, "Organic Carrots");
        assert_eq!(product.base_price_cents, 475);
        assert!(!product.is_active);
    }

    #[test]
    fn reference_price_prefers_original() {
        let product = draft().into_product().unwrap();
        assert_eq!(product.reference_price_cents(), 500);

        let mut no_original = draft();
        no_original.original_price_cents = None;
        let product = no_original.into_product().unwrap();
        assert_eq!(product.reference_price_cents(), 450);
    }
}
