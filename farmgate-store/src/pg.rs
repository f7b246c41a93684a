use async_trait::async_trait;
use chrono::{DateTime, Utc};
use farmgate_cart::{Cart, CartItem, Wishlist};
use farmgate_catalog::{Category, PriceBreak, Product};
use farmgate_core::repository::{
    CartRepository, CategoryRepository, OrderRepository, ProductFilter, ProductRepository,
    RepoError, WishlistRepository,
};
use farmgate_order::{Order, OrderItem, OrderStatus};
use farmgate_shared::pii::Masked;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Products
// ============================================================================

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying. JSONB columns come back as Value
// and are decoded into their domain shape afterwards.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    sku: String,
    name: String,
    description: Option<String>,
    category_id: Option<Uuid>,
    base_price_cents: i64,
    original_price_cents: Option<i64>,
    price_breaks: Value,
    unit: String,
    stock_quantity: i32,
    image_url: Option<String>,
    is_active: bool,
    is_featured: bool,
    metadata: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepoError> {
        let price_breaks: Vec<PriceBreak> = serde_json::from_value(self.price_breaks)?;
        Ok(Product {
            id: self.id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            base_price_cents: self.base_price_cents,
            original_price_cents: self.original_price_cents,
            price_breaks,
            unit: self.unit,
            stock_quantity: self.stock_quantity,
            image_url: self.image_url,
            is_active: self.is_active,
            is_featured: self.is_featured,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, sku, name, description, category_id, base_price_cents, \
     original_price_cents, price_breaks, unit, stock_quantity, image_url, is_active, \
     is_featured, metadata, created_at, updated_at";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create_product(&self, product: &Product) -> Result<Uuid, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, description, category_id, base_price_cents,
                original_price_cents, price_breaks, unit, stock_quantity, image_url,
                is_active, is_featured, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.base_price_cents)
        .bind(product.original_price_cents)
        .bind(serde_json::to_value(&product.price_breaks)?)
        .bind(&product.unit)
        .bind(product.stock_quantity)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.is_featured)
        .bind(&product.metadata)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.id)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn get_products(&self, ids: &[Uuid]) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, i64), RepoError> {
        let page = filter.page.max(1);
        let per_page = filter.per_page.clamp(1, 100);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
              AND ($3 OR is_active)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.category_id)
        .bind(&filter.search)
        .bind(filter.include_inactive)
        .bind(per_page as i64)
        .bind(((page - 1) * per_page) as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
              AND ($3 OR is_active)
            "#,
        )
        .bind(filter.category_id)
        .bind(&filter.search)
        .bind(filter.include_inactive)
        .fetch_one(&self.pool)
        .await?;

        let products = rows
            .into_iter()
            .map(ProductRow::into_product)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((products, total.0))
    }

    async fn update_product(&self, product: &Product) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE products SET sku = $2, name = $3, description = $4, category_id = $5,
                base_price_cents = $6, original_price_cents = $7, price_breaks = $8,
                unit = $9, stock_quantity = $10, image_url = $11, is_active = $12,
                is_featured = $13, metadata = $14, updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.base_price_cents)
        .bind(product.original_price_cents)
        .bind(serde_json::to_value(&product.price_breaks)?)
        .bind(&product.unit)
        .bind(product.stock_quantity)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.is_featured)
        .bind(&product.metadata)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_stock(&self, id: Uuid, stock_quantity: i32) -> Result<(), RepoError> {
        sqlx::query("UPDATE products SET stock_quantity = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(stock_quantity)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Categories
// ============================================================================

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create_category(&self, category: &Category) -> Result<Uuid, RepoError> {
        sqlx::query(
            "INSERT INTO categories (id, name, slug, description, image_url, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image_url)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(category.id)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update_category(&self, category: &Category) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE categories SET name = $2, slug = $3, description = $4, image_url = $5 \
             WHERE id = $1",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Carts & wishlists (one JSONB document per customer)
// ============================================================================

pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    customer_id: String,
    items: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn get_cart(&self, customer_id: &str) -> Result<Option<Cart>, RepoError> {
        let row = sqlx::query_as::<_, CartRow>("SELECT * FROM carts WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items: Vec<CartItem> = serde_json::from_value(row.items)?;
                Ok(Some(Cart {
                    customer_id: row.customer_id,
                    items,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                }))
            }
            None => Ok(None),
        }
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO carts (customer_id, items, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (customer_id) DO UPDATE SET items = $2, updated_at = $4
            "#,
        )
        .bind(&cart.customer_id)
        .bind(serde_json::to_value(&cart.items)?)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_cart(&self, customer_id: &str) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM carts WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

pub struct PgWishlistRepository {
    pool: PgPool,
}

impl PgWishlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WishlistRow {
    customer_id: String,
    product_ids: Value,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl WishlistRepository for PgWishlistRepository {
    async fn get_wishlist(&self, customer_id: &str) -> Result<Option<Wishlist>, RepoError> {
        let row =
            sqlx::query_as::<_, WishlistRow>("SELECT * FROM wishlists WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => {
                let product_ids: Vec<Uuid> = serde_json::from_value(row.product_ids)?;
                Ok(Some(Wishlist {
                    customer_id: row.customer_id,
                    product_ids,
                    updated_at: row.updated_at,
                }))
            }
            None => Ok(None),
        }
    }

    async fn save_wishlist(&self, wishlist: &Wishlist) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO wishlists (customer_id, product_ids, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (customer_id) DO UPDATE SET product_ids = $2, updated_at = $3
            "#,
        )
        .bind(&wishlist.customer_id)
        .bind(serde_json::to_value(&wishlist.product_ids)?)
        .bind(wishlist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn items_for(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepoError> {
        let rows =
            sqlx::query_as::<_, OrderItemRow>("SELECT * FROM order_items WHERE order_id = $1")
                .bind(order_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    customer_id: String,
    customer_email: String,
    subtotal_cents: i64,
    savings_cents: i64,
    total_cents: i64,
    item_count: i64,
    currency: String,
    status: String,
    shipping_address: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepoError> {
        let status: OrderStatus = self.status.parse()?;
        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            customer_id: self.customer_id,
            customer_email: Masked(self.customer_email),
            items,
            subtotal_cents: self.subtotal_cents,
            savings_cents: self.savings_cents,
            total_cents: self.total_cents,
            item_count: self.item_count,
            currency: self.currency,
            status,
            shipping_address: self.shipping_address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    name: String,
    unit: String,
    quantity: i32,
    unit_price_cents: i64,
    line_total_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            name: row.name,
            unit: row.unit,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            line_total_cents: row.line_total_cents,
        }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<Uuid, RepoError> {
        // Order and its items land together or not at all.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, customer_id, customer_email, subtotal_cents,
                savings_cents, total_cents, item_count, currency, status, shipping_address,
                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(&order.customer_id)
        .bind(order.customer_email.inner())
        .bind(order.subtotal_cents)
        .bind(order.savings_cents)
        .bind(order.total_cents)
        .bind(order.item_count)
        .bind(&order.currency)
        .bind(order.status.to_string())
        .bind(&order.shipping_address)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, name, unit, quantity,
                    unit_price_cents, line_total_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(&item.unit)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order.id)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items = self.items_for(row.id).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    async fn list_orders(&self, page: u32, per_page: u32) -> Result<(Vec<Order>, i64), RepoError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);

        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(per_page as i64)
        .bind(((page - 1) * per_page) as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.id).await?;
            orders.push(row.into_order(items)?);
        }

        Ok((orders, total.0))
    }

    async fn list_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, RepoError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.id).await?;
            orders.push(row.into_order(items)?);
        }

        Ok(orders)
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<(), RepoError> {
        sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
