use std::sync::Arc;
use std::time::Duration;

use cache::InMemoryOrderCache;
use common::{Id, ManualClock};
use messaging::InMemoryEventSink;
use store::InMemoryOrderRepository;

use crate::{OrderService, ServiceConfig};

pub(crate) const PICKUP_POINT: u64 = 10;

pub(crate) struct Harness {
    pub service: OrderService,
    pub repo: InMemoryOrderRepository,
    pub cache: InMemoryOrderCache,
    pub sink: InMemoryEventSink,
    pub clock: ManualClock,
}

pub(crate) fn harness() -> Harness {
    let clock = ManualClock::default();
    let repo = InMemoryOrderRepository::with_clock(Arc::new(clock.clone()));
    let cache = InMemoryOrderCache::with_clock(Duration::from_secs(45), Arc::new(clock.clone()));
    let sink = InMemoryEventSink::new();

    let service = OrderService::new(
        ServiceConfig::new(Id::new(PICKUP_POINT)),
        Arc::new(repo.clone()),
        Arc::new(cache.clone()),
        Arc::new(sink.clone()),
    )
    .with_clock(Arc::new(clock.clone()));

    Harness {
        service,
        repo,
        cache,
        sink,
        clock,
    }
}
