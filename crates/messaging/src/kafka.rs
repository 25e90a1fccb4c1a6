use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::{EventSink, Result, SinkError};

/// Kafka-backed event sink.
///
/// Messages with the same key land on the same partition, so events for one
/// order keep their relative order.
pub struct KafkaEventSink {
    producer: FutureProducer,
    topic: String,
    send_timeout: Duration,
}

impl KafkaEventSink {
    /// Creates a producer for `brokers` (comma-separated) writing to `topic`.
    ///
    /// Every message waits for acknowledgement from all in-sync replicas.
    pub fn new(brokers: &str, topic: impl Into<String>, send_timeout: Duration) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("acks", "all")
            .set("partitioner", "murmur2_random")
            .set("message.timeout.ms", send_timeout.as_millis().to_string())
            .create()
            .map_err(|e| SinkError::Config(e.to_string()))?;

        let topic = topic.into();
        tracing::info!(brokers, topic = %topic, "created kafka producer");

        Ok(Self {
            producer,
            topic,
            send_timeout,
        })
    }

    /// The topic every message is written to.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl EventSink for KafkaEventSink {
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let record = FutureRecord::to(&self.topic).key(key).payload(value);

        self.producer
            .send(record, Timeout::After(self.send_timeout))
            .await
            .map_err(|(e, _)| SinkError::Broker(e.to_string()))?;

        tracing::debug!(topic = %self.topic, "published event");
        Ok(())
    }
}
