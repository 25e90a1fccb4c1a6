//! Adapter selection and service wiring.

use std::sync::Arc;
use std::time::Duration;

use cache::{InMemoryOrderCache, OrderCache, RedisOrderCache};
use messaging::{EventSink, InMemoryEventSink};
use service::OrderService;
use sqlx::postgres::PgPoolOptions;
use store::{InMemoryOrderRepository, OrderRepository, PostgresOrderRepository};
use thiserror::Error;

use crate::config::Config;

const MAX_DB_CONNECTIONS: u32 = 10;

/// Errors raised while connecting the service to its backends.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("event sink error: {0}")]
    Sink(#[from] messaging::SinkError),
}

/// Builds the order service from `config`.
///
/// Each backend without a configured URL falls back to its in-memory
/// adapter, so the binary runs standalone.
pub async fn build_service(config: &Config) -> Result<OrderService, BootstrapError> {
    let service_config = config.service_config();
    let repo = build_repository(config).await?;
    let cache = build_cache(config).await?;
    let sink = build_sink(config, service_config.event_publish_timeout)?;

    Ok(OrderService::new(service_config, repo, cache, sink))
}

async fn build_repository(config: &Config) -> Result<Arc<dyn OrderRepository>, BootstrapError> {
    let Some(url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, orders are kept in memory");
        return Ok(Arc::new(InMemoryOrderRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(url)
        .await?;
    let repo = PostgresOrderRepository::new(pool);
    repo.run_migrations().await?;

    tracing::info!("connected to postgres");
    Ok(Arc::new(repo))
}

async fn build_cache(config: &Config) -> Result<Arc<dyn OrderCache>, BootstrapError> {
    match &config.redis_url {
        Some(url) => Ok(Arc::new(RedisOrderCache::connect(url, config.cache_ttl).await?)),
        None => {
            tracing::info!(ttl_secs = config.cache_ttl.as_secs(), "using in-process order cache");
            Ok(Arc::new(InMemoryOrderCache::new(config.cache_ttl)))
        }
    }
}

#[cfg(feature = "kafka")]
fn build_sink(config: &Config, timeout: Duration) -> Result<Arc<dyn EventSink>, BootstrapError> {
    match &config.kafka_brokers {
        Some(brokers) => Ok(Arc::new(messaging::KafkaEventSink::new(
            brokers,
            config.kafka_topic.as_str(),
            timeout,
        )?)),
        None => {
            tracing::warn!("KAFKA_BROKERS not set, events are kept in memory");
            Ok(Arc::new(InMemoryEventSink::new()))
        }
    }
}

#[cfg(not(feature = "kafka"))]
fn build_sink(config: &Config, _timeout: Duration) -> Result<Arc<dyn EventSink>, BootstrapError> {
    if config.kafka_brokers.is_some() {
        tracing::warn!("built without the kafka feature, KAFKA_BROKERS is ignored");
    }
    Ok(Arc::new(InMemoryEventSink::new()))
}
