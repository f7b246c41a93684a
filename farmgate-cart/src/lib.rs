pub mod models;
pub mod quote;

pub use models::{Cart, CartItem, Wishlist};
pub use quote::{build_quote, CartQuote, QuoteLine};
