//! Cache-aside reads and write-through updates.

use cache::order_key;
use common::Id;
use domain::Order;
use store::Written;

use crate::error::{Result, ServiceError};
use crate::service::OrderService;

impl OrderService {
    /// Loads an order, preferring the cache.
    ///
    /// A hit skips the store entirely. A miss reads the store and fills the
    /// cache with what it found.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: Id) -> Result<Order> {
        if let Some(order) = self.cache.get(&order_key(id)).await {
            tracing::debug!(order_id = %id, "order cache hit");
            return Ok(order);
        }

        let order = self.repo.get(id).await.map_err(ServiceError::from_lookup)?;
        self.set_order_cache(&order).await;
        Ok(order)
    }

    /// Writes an order to the store, then caches the persisted row.
    pub(crate) async fn add_or_update(&self, order: &Order) -> Result<Written> {
        let written = self.repo.upsert(order).await?;
        self.set_order_cache(&written.order).await;
        Ok(written)
    }

    /// Writes orders to the store as one batch, then caches each persisted row.
    pub(crate) async fn add_or_update_list(&self, orders: &[Order]) -> Result<Vec<Order>> {
        let stored = self.repo.upsert_batch(orders).await?;
        for order in &stored {
            self.set_order_cache(order).await;
        }
        Ok(stored)
    }

    /// Caches an order. Failures are logged and otherwise ignored: the next
    /// miss reloads from the store.
    pub(crate) async fn set_order_cache(&self, order: &Order) {
        if let Err(e) = self.cache.set(&order_key(order.id()), order).await {
            tracing::warn!(error = %e, order_id = %order.id(), "failed to cache order");
        }
    }
}
