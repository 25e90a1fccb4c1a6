use common::Id;
use thiserror::Error;

/// Errors that can occur when interacting with the order repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order with this ID is stored.
    #[error("Order not found: {0}")]
    NotFound(Id),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back to an order.
    #[error("Invalid order row: {0}")]
    InvalidRow(String),

    /// The backing store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true if the error means the order does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
