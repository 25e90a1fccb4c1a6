use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Clock, Id, SystemClock};
use domain::{Filter, Order};
use tokio::sync::RwLock;

use crate::{OrderRepository, Result, StoreError, Written};

/// In-memory order repository for testing and single-process runs.
///
/// A single write lock around the map gives every call the atomicity a
/// database transaction would, including `upsert_batch`.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<BTreeMap<Id, Order>>>,
    clock: Arc<dyn Clock>,
    get_calls: Arc<AtomicU64>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository stamping writes with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty repository stamping writes with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(BTreeMap::new())),
            clock,
            get_calls: Arc::new(AtomicU64::new(0)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }

    /// Returns how many times `get` has been called.
    pub fn get_calls(&self) -> u64 {
        self.get_calls.load(Ordering::Relaxed)
    }

    /// Makes every subsequent write fail with `Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }

    fn stamp(order: &Order, previous: Option<&Order>, now: DateTime<Utc>) -> Order {
        let mut stamped = order.clone();
        if let Some(at) = previous.and_then(Order::status_updated_at) {
            stamped = stamped.stamped(at);
        }
        stamped.stamped(now)
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryOrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOrderRepository")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get(&self, id: Id) -> Result<Order> {
        self.get_calls.fetch_add(1, Ordering::Relaxed);
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: Id) -> Result<()> {
        self.check_writable()?;
        self.orders
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, order: &Order) -> Result<Written> {
        self.check_writable()?;
        let mut store = self.orders.write().await;

        if let Some(existing) = store.get(&order.id()) {
            return Ok(Written {
                order: existing.clone(),
                existed: true,
            });
        }

        let stored = Self::stamp(order, None, self.clock.now());
        store.insert(stored.id(), stored.clone());
        Ok(Written {
            order: stored,
            existed: false,
        })
    }

    async fn upsert(&self, order: &Order) -> Result<Written> {
        self.check_writable()?;
        let mut store = self.orders.write().await;

        let previous = store.get(&order.id());
        let existed = previous.is_some();
        let stored = Self::stamp(order, previous, self.clock.now());
        store.insert(stored.id(), stored.clone());

        Ok(Written {
            order: stored,
            existed,
        })
    }

    async fn upsert_batch(&self, orders: &[Order]) -> Result<Vec<Order>> {
        self.check_writable()?;
        let mut store = self.orders.write().await;
        let now = self.clock.now();

        let mut stored = Vec::with_capacity(orders.len());
        for order in orders {
            let written = Self::stamp(order, store.get(&order.id()), now);
            store.insert(written.id(), written.clone());
            stored.push(written);
        }
        Ok(stored)
    }

    async fn query(&self, filter: &Filter, offset: u64, limit: i64) -> Result<Vec<Order>> {
        let store = self.orders.read().await;
        let matching = store
            .values()
            .filter(|o| filter.matches(o))
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .cloned();

        let orders = match usize::try_from(limit) {
            Ok(limit) if limit > 0 => matching.take(limit).collect(),
            _ => matching.collect(),
        };
        Ok(orders)
    }

    async fn delete_by(&self, filter: &Filter) -> Result<u64> {
        self.check_writable()?;
        let mut store = self.orders.write().await;
        let before = store.len();
        store.retain(|_, o| !filter.matches(o));
        Ok((before - store.len()) as u64)
    }
}
