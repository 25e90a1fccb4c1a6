//! Cache port for orders.
//!
//! The cache holds a disposable copy of order state keyed by
//! [`order_key`]. Entries expire after a fixed time-to-live; nothing
//! invalidates them early. Under concurrent writers on several instances a
//! reader may therefore see an order up to one TTL old. That window is the
//! accepted price for skipping invalidation traffic; the store stays the
//! source of truth.

pub mod error;
pub mod memory;
pub mod redis_cache;

use async_trait::async_trait;
use common::Id;
use domain::Order;

pub use redis_cache::RedisOrderCache;
pub use error::{CacheError, Result};
pub use memory::InMemoryOrderCache;

/// Returns the cache key for an order.
pub fn order_key(id: Id) -> String {
    format!("order:{id}")
}

/// Key/value cache of orders with a fixed time-to-live.
#[async_trait]
pub trait OrderCache: Send + Sync {
    /// Returns the cached order, or `None` on a miss.
    ///
    /// Backend failures are reported as misses so reads fall through to the
    /// store.
    async fn get(&self, key: &str) -> Option<Order>;

    /// Stores `order` under `key` for one TTL.
    async fn set(&self, key: &str, order: &Order) -> Result<()>;
}
