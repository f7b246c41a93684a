pub mod models;
pub mod status;

pub use models::{Order, OrderItem};
pub use status::{OrderError, OrderStatus};
