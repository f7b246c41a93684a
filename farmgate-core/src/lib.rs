pub mod repository;

pub use repository::{
    CartRepository, CategoryRepository, OrderRepository, ProductFilter, ProductRepository,
    RepoError, WishlistRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Resource not found: {0}")]
    NotFoundError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
