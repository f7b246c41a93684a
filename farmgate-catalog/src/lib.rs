pub mod pricing;
pub mod product;
pub mod stock;

pub use pricing::{discount_percent, resolve_unit_price, summarize_order};
pub use pricing::{OrderSummary, PriceBreak, PricedLine};
pub use product::{CatalogError, Category, Product, ProductDraft, ProductPatch};
pub use stock::{check_availability, StockError};
