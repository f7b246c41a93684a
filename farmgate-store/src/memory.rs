//! In-memory repository implementations backed by RwLock'd maps.
//! Used by the integration tests and for local development without Postgres.

use async_trait::async_trait;
use farmgate_cart::{Cart, Wishlist};
use farmgate_catalog::{Category, Product};
use farmgate_core::repository::{
    CartRepository, CategoryRepository, OrderRepository, ProductFilter, ProductRepository,
    RepoError, WishlistRepository,
};
use farmgate_order::{Order, OrderStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryProductRepository {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create_product(&self, product: &Product) -> Result<Uuid, RepoError> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product.id)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_products(&self, ids: &[Uuid]) -> Result<Vec<Product>, RepoError> {
        let products = self.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, i64), RepoError> {
        let products = self.products.read().await;
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matches: Vec<Product> = products
            .values()
            .filter(|p| filter.include_inactive || p.is_active)
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == Some(c)))
            .filter(|p| {
                needle
                    .as_ref()
                    .is_none_or(|n| p.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len() as i64;
        let page = filter.page.max(1) as usize;
        let per_page = filter.per_page.clamp(1, 100) as usize;
        let paged = matches
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok((paged, total))
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepoError> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn set_stock(&self, id: Uuid, stock_quantity: i32) -> Result<(), RepoError> {
        if let Some(product) = self.products.write().await.get_mut(&id) {
            product.stock_quantity = stock_quantity;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCategoryRepository {
    categories: RwLock<HashMap<Uuid, Category>>,
}

impl MemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn create_category(&self, category: &Category) -> Result<Uuid, RepoError> {
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category.id)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let mut all: Vec<Category> = self.categories.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update_category(&self, category: &Category) -> Result<(), RepoError> {
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryCartRepository {
    carts: RwLock<HashMap<String, Cart>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn get_cart(&self, customer_id: &str) -> Result<Option<Cart>, RepoError> {
        Ok(self.carts.read().await.get(customer_id).cloned())
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), RepoError> {
        self.carts
            .write()
            .await
            .insert(cart.customer_id.clone(), cart.clone());
        Ok(())
    }

    async fn delete_cart(&self, customer_id: &str) -> Result<(), RepoError> {
        self.carts.write().await.remove(customer_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryWishlistRepository {
    wishlists: RwLock<HashMap<String, Wishlist>>,
}

impl MemoryWishlistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WishlistRepository for MemoryWishlistRepository {
    async fn get_wishlist(&self, customer_id: &str) -> Result<Option<Wishlist>, RepoError> {
        Ok(self.wishlists.read().await.get(customer_id).cloned())
    }

    async fn save_wishlist(&self, wishlist: &Wishlist) -> Result<(), RepoError> {
        self.wishlists
            .write()
            .await
            .insert(wishlist.customer_id.clone(), wishlist.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<Uuid, RepoError> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order.id)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_orders(&self, page: u32, per_page: u32) -> Result<(Vec<Order>, i64), RepoError> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = all.len() as i64;
        let page = page.max(1) as usize;
        let per_page = per_page.clamp(1, 100) as usize;
        let paged = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok((paged, total))
    }

    async fn list_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, RepoError> {
        let orders = self.orders.read().await;
        let mut mine: Vec<Order> = orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<(), RepoError> {
        if let Some(order) = self.orders.write().await.get_mut(&id) {
            order.status = status;
            order.updated_at = chrono::Utc::now();
        }
        Ok(())
    }
}
