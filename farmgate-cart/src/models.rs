use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cart document per customer. Lines are bare (product_id, quantity)
/// pairs; pricing happens fresh on every read via the quote layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub customer_id: String,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl Cart {
    pub fn new(customer_id: String) -> Self {
        let now = Utc::now();
        Self {
            customer_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge-add: an existing line for the same product absorbs the quantity.
    /// Non-positive quantities are a no-op.
    pub fn add_item(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                product_id,
                quantity,
            }),
        }
        self.updated_at = Utc::now();
    }

    /// Set a line's quantity outright; zero or negative removes the line.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => line.quantity = quantity,
            None => self.items.push(CartItem {
                product_id,
                quantity,
            }),
        }
        self.updated_at = Utc::now();
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
        self.updated_at = Utc::now();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A customer's saved products. Add is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    pub customer_id: String,
    pub product_ids: Vec<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl Wishlist {
    pub fn new(customer_id: String) -> Self {
        Self {
            customer_id,
            product_ids: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn add(&mut self, product_id: Uuid) {
        if !self.product_ids.contains(&product_id) {
            self.product_ids.push(product_id);
            self.updated_at = Utc::now();
        }
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.product_ids.retain(|id| *id != product_id);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_merges_quantity() {
        let mut cart = Cart::new("cust-1".into());
        let apples = Uuid::new_v4();

        cart.add_item(apples, 2);
        cart.add_item(apples, 3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn add_non_positive_is_noop() {
        let mut cart = Cart::new("cust-1".into());
        cart.add_item(Uuid::new_v4(), 0);
        cart.add_item(Uuid::new_v4(), -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = Cart::new("cust-1".into());
        let apples = Uuid::new_v4();

        cart.add_item(apples, 2);
        cart.set_quantity(apples, 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_replaces_rather_than_merges() {
        let mut cart = Cart::new("cust-1".into());
        let apples = Uuid::new_v4();

        cart.add_item(apples, 2);
        cart.set_quantity(apples, 7);

        assert_eq!(cart.items[0].quantity, 7);
    }

    #[test]
    fn quantity_saturates_at_i32_max() {
        let mut cart = Cart::new("cust-1".into());
        let apples = Uuid::new_v4();

        cart.add_item(apples, i32::MAX);
        cart.add_item(apples, 1);

        assert_eq!(cart.items[0].quantity, i32::MAX);
    }

    #[test]
    fn wishlist_add_is_idempotent() {
        let mut wishlist = Wishlist::new("cust-1".into());
        let apples = Uuid::new_v4();

        wishlist.add(apples);
        wishlist.add(apples);

        assert_eq!(wishlist.product_ids.len(), 1);

        wishlist.remove(apples);
        assert!(wishlist.product_ids.is_empty());
    }
}
