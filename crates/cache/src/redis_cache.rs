use std::time::Duration;

use async_trait::async_trait;
use domain::Order;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::{OrderCache, Result};

/// Redis-backed order cache.
///
/// Values are JSON-encoded orders written with `SET … EX ttl`.
#[derive(Clone)]
pub struct RedisOrderCache {
    conn: MultiplexedConnection,
    ttl: Duration,
}

impl RedisOrderCache {
    /// Connects to `url` and checks the server answers `PING`.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;

        tracing::info!(ttl_secs = ttl.as_secs(), "connected to redis cache");
        Ok(Self { conn, ttl })
    }

    /// The time-to-live applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl OrderCache for RedisOrderCache {
    async fn get(&self, key: &str) -> Option<Order> {
        let mut conn = self.conn.clone();
        let raw = match conn.get::<_, Option<String>>(key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, key, "failed to fetch cached order");
                return None;
            }
        };

        match serde_json::from_str(&raw?) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, key, "failed to decode cached order");
                None
            }
        }
    }

    async fn set(&self, key: &str, order: &Order) -> Result<()> {
        let payload = serde_json::to_string(order)?;
        let mut conn = self.conn.clone();
        // SET EX rejects a zero expiry.
        let seconds = self.ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, payload, seconds).await?;
        Ok(())
    }
}
