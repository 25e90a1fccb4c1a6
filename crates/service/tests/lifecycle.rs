//! End-to-end lifecycle tests against the in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use cache::InMemoryOrderCache;
use chrono::TimeDelta;
use common::{Id, ManualClock};
use domain::{Operation, Order, OrderEvent, PackagingError, PackagingKind, Status};
use messaging::InMemoryEventSink;
use service::{
    AcceptOrderRequest, AcceptReturnRequest, CancelOrderRequest, ErrorKind, GetOrdersRequest,
    GetReturnedRequest, IssueOrdersRequest, OrderService, ServiceConfig, ServiceError,
};
use store::{InMemoryOrderRepository, OrderRepository};

const PICKUP_POINT: u64 = 10;

struct TestContext {
    service: Arc<OrderService>,
    repo: InMemoryOrderRepository,
    cache: InMemoryOrderCache,
    sink: InMemoryEventSink,
    clock: ManualClock,
}

fn setup() -> TestContext {
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

    TestContext {
        service: Arc::new(service),
        repo,
        cache,
        sink,
        clock,
    }
}

fn accept(id: u64, client: u64) -> AcceptOrderRequest {
    AcceptOrderRequest::new(Id::new(id), Id::new(client), 10, 15)
}

fn ids(orders: &[Order]) -> Vec<u64> {
    orders.iter().map(|o| o.id().get()).collect()
}

async fn events(ctx: &TestContext, count: usize) -> Vec<OrderEvent> {
    ctx.sink
        .wait_for(count)
        .await
        .iter()
        .map(|m| serde_json::from_slice(&m.value).unwrap())
        .collect()
}

async fn accept_and_issue(ctx: &TestContext, id: u64, client: u64) -> Order {
    ctx.service.accept_order(accept(id, client)).await.unwrap();
    let response = ctx
        .service
        .issue_orders(IssueOrdersRequest::new([Id::new(id)]))
        .await
        .unwrap();
    assert!(response.rejected.is_none());
    response.orders.into_iter().next().unwrap()
}

// -- accept --

#[tokio::test]
async fn accept_twice_conflicts_and_keeps_stored_order() {
    let ctx = setup();
    let first = accept_and_issue(&ctx, 1, 1).await;

    let err = ctx
        .service
        .accept_order(AcceptOrderRequest::new(Id::new(1), Id::new(2), 99, 99))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::OrderAlreadyExists(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let stored = ctx.repo.get(Id::new(1)).await.unwrap();
    assert_eq!(stored, first);
    assert_eq!(stored.status(), Status::ReachedClient);
}

#[tokio::test]
async fn concurrent_accepts_have_one_winner() {
    let ctx = setup();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = ctx.service.clone();
            tokio::spawn(async move { service.accept_order(accept(5, 1)).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert!(matches!(e, ServiceError::OrderAlreadyExists(_))),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(ctx.repo.len().await, 1);
}

#[tokio::test]
async fn packaging_adds_its_cost() {
    let ctx = setup();

    let boxed = ctx
        .service
        .accept_order(
            AcceptOrderRequest::new(Id::new(1), Id::new(1), 30, 100)
                .with_packaging(PackagingKind::Box),
        )
        .await
        .unwrap();
    assert_eq!(boxed.cost(), 120);

    let boxed_with_film = ctx
        .service
        .accept_order(
            AcceptOrderRequest::new(Id::new(2), Id::new(1), 30, 100)
                .with_packaging(PackagingKind::Box)
                .with_film(),
        )
        .await
        .unwrap();
    assert_eq!(boxed_with_film.cost(), 121);

    let bagged = ctx
        .service
        .accept_order(
            AcceptOrderRequest::new(Id::new(3), Id::new(1), 10, 100)
                .with_packaging(PackagingKind::Bag),
        )
        .await
        .unwrap();
    assert_eq!(bagged.cost(), 105);

    let filmed = ctx
        .service
        .accept_order(
            AcceptOrderRequest::new(Id::new(4), Id::new(1), 500, 100)
                .with_packaging(PackagingKind::Film),
        )
        .await
        .unwrap();
    assert_eq!(filmed.cost(), 101);
}

#[tokio::test]
async fn packaging_rejections_store_nothing() {
    let ctx = setup();

    let too_heavy = ctx
        .service
        .accept_order(
            AcceptOrderRequest::new(Id::new(1), Id::new(1), 11, 100)
                .with_packaging(PackagingKind::Bag),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        too_heavy,
        ServiceError::Packaging(PackagingError::WeightLimitExceeded { limit: 10, weight: 11 })
    ));
    assert_eq!(too_heavy.kind(), ErrorKind::InvalidInput);

    let film_only = ctx
        .service
        .accept_order(AcceptOrderRequest::new(Id::new(2), Id::new(1), 1, 1).with_film())
        .await
        .unwrap_err();
    assert!(matches!(
        film_only,
        ServiceError::Packaging(PackagingError::NoPrimaryPackaging)
    ));

    let film_on_film = ctx
        .service
        .accept_order(
            AcceptOrderRequest::new(Id::new(3), Id::new(1), 1, 1)
                .with_packaging(PackagingKind::Film)
                .with_film(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        film_on_film,
        ServiceError::Packaging(PackagingError::WrapNotSupported(_))
    ));

    assert!(ctx.repo.is_empty().await);
    assert!(ctx.sink.messages().await.is_empty());
}

#[tokio::test]
async fn get_after_accept_is_served_from_cache() {
    let ctx = setup();

    let accepted = ctx.service.accept_order(accept(1, 1)).await.unwrap();
    let loaded = ctx.service.get_order(Id::new(1)).await.unwrap();

    assert_eq!(ctx.repo.get_calls(), 0);
    assert_eq!(loaded.id(), Id::new(1));
    assert_eq!(loaded.client_id(), Id::new(1));
    assert_eq!(loaded.pickup_point_id(), Id::new(PICKUP_POINT));
    assert_eq!(loaded.status(), Status::Stored);
    assert_eq!(loaded.weight(), 10);
    assert_eq!(loaded.cost(), 15);
    assert_eq!(loaded, accepted);
}

#[tokio::test]
async fn accept_survives_sink_and_cache_failures() {
    let ctx = setup();
    ctx.sink.set_fail(true);
    ctx.cache.set_fail_sets(true);

    let accepted = ctx.service.accept_order(accept(1, 1)).await.unwrap();

    assert_eq!(ctx.repo.get(Id::new(1)).await.unwrap(), accepted);
    assert!(ctx.sink.messages().await.is_empty());
    assert!(!ctx.cache.contains("order:1").await);
}

#[tokio::test]
async fn store_failure_fails_accept() {
    let ctx = setup();
    ctx.repo.set_fail_writes(true);

    let err = ctx.service.accept_order(accept(1, 1)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(ctx.sink.messages().await.is_empty());
}

// -- issue --

#[tokio::test]
async fn issue_rejects_other_clients_orders() {
    let ctx = setup();
    ctx.service.accept_order(accept(1, 1)).await.unwrap();
    ctx.service.accept_order(accept(2, 2)).await.unwrap();

    let response = ctx
        .service
        .issue_orders(IssueOrdersRequest::new([Id::new(1), Id::new(2)]))
        .await
        .unwrap();

    assert_eq!(ids(&response.orders), vec![1]);
    assert_eq!(response.orders[0].status(), Status::ReachedClient);

    let rejected = response.rejected.unwrap();
    assert_eq!(rejected.ids(), vec![Id::new(2)]);
    assert!(rejected.to_string().contains("order 2"));

    assert_eq!(
        ctx.repo.get(Id::new(2)).await.unwrap().status(),
        Status::Stored
    );
}

#[tokio::test]
async fn issue_rejects_unknown_issued_and_foreign_orders() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;
    ctx.service.accept_order(accept(2, 1)).await.unwrap();
    ctx.repo
        .insert(&Order::new(Id::new(3), Id::new(1), Id::new(99), 1, 1))
        .await
        .unwrap();

    let response = ctx
        .service
        .issue_orders(IssueOrdersRequest::new(
            [2, 1, 3, 404, 2].into_iter().map(Id::new),
        ))
        .await
        .unwrap();

    assert_eq!(ids(&response.orders), vec![2]);
    assert_eq!(
        response.rejected.unwrap().ids(),
        vec![Id::new(1), Id::new(3), Id::new(404)]
    );
}

#[tokio::test]
async fn issue_without_ids_is_invalid() {
    let ctx = setup();

    let err = ctx
        .service
        .issue_orders(IssueOrdersRequest::new(Vec::<Id>::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::EmptyIssueRequest));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn issue_with_unknown_first_id_is_not_found() {
    let ctx = setup();
    ctx.service.accept_order(accept(1, 1)).await.unwrap();

    let err = ctx
        .service
        .issue_orders(IssueOrdersRequest::new([Id::new(9), Id::new(1)]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        ctx.repo.get(Id::new(1)).await.unwrap().status(),
        Status::Stored
    );
}

#[tokio::test]
async fn issue_nothing_issuable_returns_only_errors() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;

    let response = ctx
        .service
        .issue_orders(IssueOrdersRequest::new([Id::new(1)]))
        .await
        .unwrap();

    assert!(response.orders.is_empty());
    assert_eq!(response.rejected.unwrap().len(), 1);
}

// -- cancel --

#[tokio::test]
async fn cancel_waits_for_storage_period() {
    let ctx = setup();
    ctx.service.accept_order(accept(1, 1)).await.unwrap();

    let err = ctx
        .service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::CannotCancel(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    ctx.clock.advance(TimeDelta::days(7));
    assert!(
        ctx.service
            .cancel_order(CancelOrderRequest::new(Id::new(1)))
            .await
            .is_err()
    );

    ctx.clock.advance(TimeDelta::seconds(1));
    let canceled = ctx
        .service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap();

    assert_eq!(canceled.status(), Status::Canceled);
    assert_eq!(
        ctx.repo.get(Id::new(1)).await.unwrap().status(),
        Status::Canceled
    );
}

#[tokio::test]
async fn cancel_issued_or_canceled_is_refused() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;
    ctx.clock.advance(TimeDelta::days(30));

    let err = ctx
        .service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::CannotCancel(_)));

    ctx.service.accept_order(accept(2, 1)).await.unwrap();
    ctx.clock.advance(TimeDelta::days(8));
    ctx.service
        .cancel_order(CancelOrderRequest::new(Id::new(2)))
        .await
        .unwrap();
    assert!(
        ctx.service
            .cancel_order(CancelOrderRequest::new(Id::new(2)))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn cancel_returned_order() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;
    ctx.service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(1)))
        .await
        .unwrap();

    let canceled = ctx
        .service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap();

    assert_eq!(canceled.status(), Status::Canceled);
}

#[tokio::test]
async fn cancel_unknown_order_is_not_found() {
    let ctx = setup();

    let err = ctx
        .service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// -- returns --

#[tokio::test]
async fn return_window_is_open_until_its_boundary() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;
    accept_and_issue(&ctx, 2, 1).await;

    ctx.clock.advance(TimeDelta::days(2) - TimeDelta::seconds(1));
    let returned = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(1)))
        .await
        .unwrap();
    assert_eq!(returned.status(), Status::Returned);

    ctx.clock.advance(TimeDelta::seconds(1));
    let err = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReturnExpired(_)));
    assert_eq!(
        ctx.repo.get(Id::new(2)).await.unwrap().status(),
        Status::ReachedClient
    );
}

#[tokio::test]
async fn return_checks_client_and_pickup_point() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;
    ctx.repo
        .upsert(
            &Order::new(Id::new(2), Id::new(1), Id::new(99), 1, 1)
                .with_status(Status::ReachedClient),
        )
        .await
        .unwrap();

    let wrong_client = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(2), Id::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(wrong_client, ServiceError::WrongClientId { .. }));
    assert_eq!(wrong_client.kind(), ErrorKind::InvalidInput);

    let wrong_point = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(2)))
        .await
        .unwrap_err();
    assert!(matches!(wrong_point, ServiceError::WrongPickupPoint(_)));
}

#[tokio::test]
async fn return_of_unknown_order_is_not_issued() {
    let ctx = setup();

    let err = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(404)))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::OrderNotIssued(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn return_of_stored_order_checks_owner_then_expires() {
    let ctx = setup();
    ctx.service.accept_order(accept(1, 1)).await.unwrap();

    let wrong_client = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(2), Id::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(wrong_client, ServiceError::WrongClientId { .. }));

    let owner = ctx
        .service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(owner, ServiceError::ReturnExpired(_)));
    assert_eq!(
        ctx.repo.get(Id::new(1)).await.unwrap().status(),
        Status::Stored
    );
}

#[tokio::test]
async fn unbounded_durations_do_not_overflow() {
    let clock = ManualClock::default();
    let repo = InMemoryOrderRepository::with_clock(Arc::new(clock.clone()));
    let service = OrderService::new(
        ServiceConfig::new(Id::new(PICKUP_POINT))
            .with_store_duration(TimeDelta::MAX)
            .with_return_window(TimeDelta::MAX),
        Arc::new(repo.clone()),
        Arc::new(InMemoryOrderCache::with_clock(
            Duration::from_secs(45),
            Arc::new(clock.clone()),
        )),
        Arc::new(InMemoryEventSink::new()),
    )
    .with_clock(Arc::new(clock.clone()));

    service.accept_order(accept(1, 1)).await.unwrap();
    service.accept_order(accept(2, 1)).await.unwrap();
    service
        .issue_orders(IssueOrdersRequest::new([Id::new(2)]))
        .await
        .unwrap();
    clock.advance(TimeDelta::days(365 * 50));

    let err = service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::CannotCancel(_)));

    let returned = service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(2)))
        .await
        .unwrap();
    assert_eq!(returned.status(), Status::Returned);
}

// -- queries --

#[tokio::test]
async fn get_orders_lists_stored_orders_only() {
    let ctx = setup();
    ctx.service.accept_order(accept(1, 1)).await.unwrap();
    ctx.repo
        .insert(&Order::new(Id::new(2), Id::new(1), Id::new(99), 1, 1))
        .await
        .unwrap();
    accept_and_issue(&ctx, 3, 1).await;
    ctx.service.accept_order(accept(4, 2)).await.unwrap();

    let all = ctx
        .service
        .get_orders(GetOrdersRequest::new(Id::new(1)))
        .await
        .unwrap();
    assert_eq!(ids(&all), vec![1, 2]);

    let local = ctx
        .service
        .get_orders(GetOrdersRequest::new(Id::new(1)).local_only())
        .await
        .unwrap();
    assert_eq!(ids(&local), vec![1]);
}

#[tokio::test]
async fn get_returned_pages_by_offset() {
    let ctx = setup();
    for id in 1..=4 {
        accept_and_issue(&ctx, id, 1).await;
        ctx.service
            .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(id)))
            .await
            .unwrap();
    }
    ctx.service.accept_order(accept(5, 1)).await.unwrap();

    let page = ctx
        .service
        .get_returned(GetReturnedRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![2, 3]);

    let rest = ctx
        .service
        .get_returned(GetReturnedRequest::new(1, 0))
        .await
        .unwrap();
    assert_eq!(ids(&rest), vec![2, 3, 4]);

    let all = ctx
        .service
        .get_returned(GetReturnedRequest::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
}

// -- scenario --

#[tokio::test]
async fn accept_list_issue_scenario() {
    let ctx = setup();
    ctx.service.accept_order(accept(1, 1)).await.unwrap();

    let orders = ctx
        .service
        .get_orders(GetOrdersRequest::new(Id::new(1)))
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status(), Status::Stored);
    assert_eq!(orders[0].cost(), 15);

    let response = ctx
        .service
        .issue_orders(IssueOrdersRequest::new([Id::new(1)]))
        .await
        .unwrap();
    assert_eq!(response.orders.len(), 1);
    assert_eq!(response.orders[0].status(), Status::ReachedClient);

    let orders = ctx
        .service
        .get_orders(GetOrdersRequest::new(Id::new(1)))
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn state_changes_emit_audit_events() {
    let ctx = setup();
    accept_and_issue(&ctx, 1, 1).await;
    ctx.service
        .accept_return(AcceptReturnRequest::new(Id::new(1), Id::new(1)))
        .await
        .unwrap();
    ctx.service
        .cancel_order(CancelOrderRequest::new(Id::new(1)))
        .await
        .unwrap();

    let operations: Vec<Operation> = events(&ctx, 3).await.iter().map(|e| e.operation).collect();
    assert_eq!(
        operations,
        vec![Operation::Accept, Operation::Issue, Operation::Return]
    );
    assert!(
        ctx.sink
            .messages()
            .await
            .iter()
            .all(|m| m.key == b"1")
    );
}
