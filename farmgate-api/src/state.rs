use farmgate_core::repository::{
    CartRepository, CategoryRepository, OrderRepository, ProductRepository, WishlistRepository,
};
use farmgate_store::app_config::StorefrontConfig;
use farmgate_store::EventBus;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub wishlists: Arc<dyn WishlistRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub events: EventBus,
    pub storefront: StorefrontConfig,
}
