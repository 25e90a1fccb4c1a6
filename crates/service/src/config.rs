use std::time::Duration;

use common::Id;

/// Pickup point settings the service runs with.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// The pickup point this instance serves.
    pub pickup_point_id: Id,
    /// How long an accepted order waits for its client.
    pub store_duration: chrono::Duration,
    /// How long a client may bring an issued order back.
    pub return_window: chrono::Duration,
    /// Upper bound on a single event publish.
    pub event_publish_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(pickup_point_id: Id) -> Self {
        Self {
            pickup_point_id,
            ..Self::default()
        }
    }

    pub fn with_store_duration(mut self, store_duration: chrono::Duration) -> Self {
        self.store_duration = store_duration;
        self
    }

    pub fn with_return_window(mut self, return_window: chrono::Duration) -> Self {
        self.return_window = return_window;
        self
    }

    pub fn with_event_publish_timeout(mut self, timeout: Duration) -> Self {
        self.event_publish_timeout = timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pickup_point_id: Id::default(),
            store_duration: chrono::Duration::days(7),
            return_window: chrono::Duration::days(2),
            event_publish_timeout: Duration::from_secs(5),
        }
    }
}
