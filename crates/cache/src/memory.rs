use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use common::{Clock, SystemClock};
use domain::Order;
use tokio::sync::RwLock;

use crate::{CacheError, OrderCache, Result};

#[derive(Debug, Clone)]
struct Entry {
    order: Order,
    expires_at: DateTime<Utc>,
}

/// In-process order cache with a fixed time-to-live.
///
/// Expired entries are dropped when read and swept on every write.
#[derive(Clone)]
pub struct InMemoryOrderCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    fail_sets: Arc<AtomicBool>,
}

impl InMemoryOrderCache {
    /// Creates a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a cache that measures `ttl` against `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
            fail_sets: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true if a live entry exists for `key`.
    pub async fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|e| e.expires_at > now)
    }

    /// Makes every subsequent `set` fail with `Unavailable`.
    pub fn set_fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::Relaxed);
    }

    /// Number of entries held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl std::fmt::Debug for InMemoryOrderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOrderCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrderCache for InMemoryOrderCache {
    async fn get(&self, key: &str) -> Option<Order> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.order.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop it unless a fresh value landed in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, order: &Order) -> Result<()> {
        if self.fail_sets.load(Ordering::Relaxed) {
            return Err(CacheError::Unavailable("writes disabled".to_string()));
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                order: order.clone(),
                expires_at,
            },
        );
        Ok(())
    }
}
