use async_trait::async_trait;
use uuid::Uuid;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Filter and pagination for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    /// Admin listings include inactive products; the storefront never does.
    pub include_inactive: bool,
    pub page: u32,
    pub per_page: u32,
}

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(
        &self,
        product: &farmgate_catalog::Product,
    ) -> Result<Uuid, RepoError>;

    async fn get_product(
        &self,
        id: Uuid,
    ) -> Result<Option<farmgate_catalog::Product>, RepoError>;

    async fn get_products(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<farmgate_catalog::Product>, RepoError>;

    /// Returns one page of products plus the total match count.
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<farmgate_catalog::Product>, i64), RepoError>;

    async fn update_product(
        &self,
        product: &farmgate_catalog::Product,
    ) -> Result<(), RepoError>;

    /// Hard delete. Returns false when the product did not exist.
    async fn delete_product(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Set the stored stock level after a sale.
    async fn set_stock(&self, id: Uuid, stock_quantity: i32) -> Result<(), RepoError>;
}

/// Repository trait for category access
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(
        &self,
        category: &farmgate_catalog::Category,
    ) -> Result<Uuid, RepoError>;

    async fn get_category(
        &self,
        id: Uuid,
    ) -> Result<Option<farmgate_catalog::Category>, RepoError>;

    async fn list_categories(&self) -> Result<Vec<farmgate_catalog::Category>, RepoError>;

    async fn update_category(
        &self,
        category: &farmgate_catalog::Category,
    ) -> Result<(), RepoError>;

    async fn delete_category(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Repository trait for cart documents, keyed by customer id.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn get_cart(
        &self,
        customer_id: &str,
    ) -> Result<Option<farmgate_cart::Cart>, RepoError>;

    /// Upsert the whole cart document.
    async fn save_cart(&self, cart: &farmgate_cart::Cart) -> Result<(), RepoError>;

    async fn delete_cart(&self, customer_id: &str) -> Result<(), RepoError>;
}

/// Repository trait for wishlist documents, keyed by customer id.
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn get_wishlist(
        &self,
        customer_id: &str,
    ) -> Result<Option<farmgate_cart::Wishlist>, RepoError>;

    async fn save_wishlist(&self, wishlist: &farmgate_cart::Wishlist) -> Result<(), RepoError>;
}

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(&self, order: &farmgate_order::Order) -> Result<Uuid, RepoError>;

    async fn get_order(&self, id: Uuid) -> Result<Option<farmgate_order::Order>, RepoError>;

    /// Returns one page of orders (newest first) plus the total count.
    async fn list_orders(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<farmgate_order::Order>, i64), RepoError>;

    async fn list_orders_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<farmgate_order::Order>, RepoError>;

    async fn update_order_status(
        &self,
        id: Uuid,
        status: farmgate_order::OrderStatus,
    ) -> Result<(), RepoError>;
}
