use std::sync::Arc;

use cache::OrderCache;
use common::{Clock, Id, SystemClock};
use messaging::EventSink;
use store::OrderRepository;

use crate::config::ServiceConfig;

/// The order lifecycle service for one pickup point.
///
/// Holds shared handles to its ports and immutable settings, so a single
/// instance can serve concurrent callers behind an `Arc`.
#[derive(Clone)]
pub struct OrderService {
    pub(crate) repo: Arc<dyn OrderRepository>,
    pub(crate) cache: Arc<dyn OrderCache>,
    pub(crate) sink: Arc<dyn EventSink>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: ServiceConfig,
}

impl OrderService {
    /// Creates a service reading time from the system clock.
    pub fn new(
        config: ServiceConfig,
        repo: Arc<dyn OrderRepository>,
        cache: Arc<dyn OrderCache>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            repo,
            cache,
            sink,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replaces the clock used for expiry checks and event timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The pickup point this service accepts and issues orders for.
    pub fn pickup_point_id(&self) -> Id {
        self.config.pickup_point_id
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
