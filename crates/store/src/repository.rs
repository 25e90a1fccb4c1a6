use async_trait::async_trait;
use common::Id;
use domain::{Filter, Order};

use crate::Result;

/// Outcome of a single-order write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    /// The order as it is stored after the call, carrying the write stamp.
    pub order: Order,

    /// Whether a row with this ID existed before the call.
    pub existed: bool,
}

/// Core trait for order repository implementations.
///
/// Every write runs in its own transaction and stamps `status_updated_at`
/// with the store's clock; callers never supply the stamp. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Loads an order, failing with `NotFound` if it is absent.
    async fn get(&self, id: Id) -> Result<Order>;

    /// Deletes an order, failing with `NotFound` if it is absent.
    async fn delete(&self, id: Id) -> Result<()>;

    /// Stores `order` only if its ID is free.
    ///
    /// When the ID is taken the stored row is left untouched, returned as-is,
    /// and `existed` is true. Of two concurrent inserts for one ID exactly
    /// one sees `existed == false`.
    async fn insert(&self, order: &Order) -> Result<Written>;

    /// Inserts `order` or overwrites the row with the same ID.
    async fn upsert(&self, order: &Order) -> Result<Written>;

    /// Upserts all orders atomically under repeatable-read isolation.
    ///
    /// Returns the orders as stored, in input order.
    async fn upsert_batch(&self, orders: &[Order]) -> Result<Vec<Order>>;

    /// Returns orders matching `filter`, ordered by ID.
    ///
    /// Skips `offset` matches; `limit <= 0` means no limit.
    async fn query(&self, filter: &Filter, offset: u64, limit: i64) -> Result<Vec<Order>>;

    /// Deletes every order matching `filter` and returns how many went.
    async fn delete_by(&self, filter: &Filter) -> Result<u64>;
}

/// Extension trait providing convenience methods for repositories.
#[async_trait]
pub trait OrderRepositoryExt: OrderRepository {
    /// Loads an order, mapping `NotFound` to `None`.
    async fn find(&self, id: Id) -> Result<Option<Order>> {
        match self.get(id).await {
            Ok(order) => Ok(Some(order)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns every order matching `filter`.
    async fn get_by(&self, filter: &Filter) -> Result<Vec<Order>> {
        self.query(filter, 0, 0).await
    }

    /// Checks whether an order with this ID is stored.
    async fn exists(&self, id: Id) -> Result<bool> {
        Ok(self.find(id).await?.is_some())
    }
}

// Blanket implementation for all OrderRepository implementations
impl<T: OrderRepository + ?Sized> OrderRepositoryExt for T {}
