//! Event sink port.
//!
//! Publishing is fire-and-forget from the caller's point of view: a sink
//! reports failures, but nothing upstream retries or rolls back because of
//! them. Delivery is at least once and best effort: a transport may redeliver
//! a message it retried, and a failed publish is not retried by the caller.
//! Per-key ordering only holds if the transport partitions by key.

pub mod error;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod memory;

use async_trait::async_trait;

pub use error::{Result, SinkError};
#[cfg(feature = "kafka")]
pub use kafka::KafkaEventSink;
pub use memory::{InMemoryEventSink, Message};

/// Publisher of key/value byte messages to an append-only log.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes one message.
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<()>;
}
