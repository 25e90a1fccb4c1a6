//! Best-effort audit event publication.

use std::sync::Arc;
use std::time::Duration;

use common::Id;
use domain::{Operation, OrderEvent};
use messaging::EventSink;

use crate::service::OrderService;

impl OrderService {
    /// Publishes an audit event for `order_id` in the background.
    ///
    /// Returns as soon as the event is encoded. Encoding errors, sink errors
    /// and timeouts are logged and counted in `order_events_failed_total`.
    pub(crate) fn send_event(&self, order_id: Id, operation: Operation) {
        let event = OrderEvent::new(order_id, operation, self.clock.now());

        let payload = match event.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, %order_id, %operation, "failed to encode event");
                record_failure(operation);
                return;
            }
        };

        let key = event.key();
        let sink = Arc::clone(&self.sink);
        let timeout = self.config.event_publish_timeout;
        tokio::spawn(async move {
            publish(sink, timeout, key, payload, order_id, operation).await;
        });
    }
}

async fn publish(
    sink: Arc<dyn EventSink>,
    timeout: Duration,
    key: Vec<u8>,
    payload: Vec<u8>,
    order_id: Id,
    operation: Operation,
) {
    match tokio::time::timeout(timeout, sink.publish(&key, &payload)).await {
        Ok(Ok(())) => {
            tracing::debug!(%order_id, %operation, "published order event");
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, %order_id, %operation, "failed to publish event");
            record_failure(operation);
        }
        Err(_) => {
            tracing::warn!(
                %order_id,
                %operation,
                timeout_ms = timeout.as_millis() as u64,
                "timed out publishing event"
            );
            record_failure(operation);
        }
    }
}

fn record_failure(operation: Operation) {
    metrics::counter!("order_events_failed_total", "operation" => operation.as_str())
        .increment(1);
}
