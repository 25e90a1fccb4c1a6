//! Application configuration loaded from environment variables.

use std::time::Duration;

use common::Id;
use service::ServiceConfig;

const DEFAULT_KAFKA_TOPIC: &str = "pvz.events.log";

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `PICKUP_POINT_ID` — the pickup point this instance serves (default: `0`)
/// - `STORE_DURATION_SECS` — storage period (default: 7 days)
/// - `RETURN_WINDOW_SECS` — return window (default: 2 days)
/// - `CACHE_TTL_SECS` — order cache time-to-live (default: `45`)
/// - `DATABASE_URL` — PostgreSQL; in-memory store when unset
/// - `REDIS_URL` — Redis; in-process cache when unset
/// - `KAFKA_BROKERS` — Kafka brokers; in-memory event log when unset
/// - `KAFKA_TOPIC` — event topic (default: `"pvz.events.log"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub pickup_point_id: Id,
    pub store_duration: Duration,
    pub return_window: Duration,
    pub cache_ttl: Duration,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub kafka_brokers: Option<String>,
    pub kafka_topic: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: Duration| {
            non_empty(key)
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            pickup_point_id: non_empty("PICKUP_POINT_ID")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pickup_point_id),
            store_duration: secs("STORE_DURATION_SECS", defaults.store_duration),
            return_window: secs("RETURN_WINDOW_SECS", defaults.return_window),
            cache_ttl: secs("CACHE_TTL_SECS", defaults.cache_ttl),
            database_url: non_empty("DATABASE_URL"),
            redis_url: non_empty("REDIS_URL"),
            kafka_brokers: non_empty("KAFKA_BROKERS"),
            kafka_topic: non_empty("KAFKA_TOPIC").unwrap_or(defaults.kafka_topic),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The lifecycle settings handed to the order service.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new(self.pickup_point_id)
            .with_store_duration(to_chrono(self.store_duration))
            .with_return_window(to_chrono(self.return_window))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            pickup_point_id: Id::default(),
            store_duration: Duration::from_secs(7 * 24 * 60 * 60),
            return_window: Duration::from_secs(2 * 24 * 60 * 60),
            cache_ttl: Duration::from_secs(45),
            database_url: None,
            redis_url: None,
            kafka_brokers: None,
            kafka_topic: DEFAULT_KAFKA_TOPIC.to_string(),
        }
    }
}

fn to_chrono(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::MAX)
}
