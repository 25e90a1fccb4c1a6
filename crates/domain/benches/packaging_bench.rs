use criterion::{Criterion, black_box, criterion_group, criterion_main};
use domain::{Id, Order, Packaging, PackagingKind, resolve_packaging};

fn bench_resolve_packaging(c: &mut Criterion) {
    c.bench_function("domain/resolve_packaging", |b| {
        b.iter(|| resolve_packaging(black_box(Some(PackagingKind::Box)), black_box(true)).unwrap());
    });
}

fn bench_apply_wrapped_packaging(c: &mut Criterion) {
    let packaging = Packaging::new(PackagingKind::Box)
        .wrap(Packaging::new(PackagingKind::Film))
        .unwrap();

    c.bench_function("domain/apply_wrapped_packaging", |b| {
        b.iter(|| {
            let mut order = Order::new(Id::new(1), Id::new(1), Id::new(0), 12, 100);
            order.apply_packaging(Some(black_box(&packaging))).unwrap();
            order
        });
    });
}

fn bench_filter_matches(c: &mut Criterion) {
    let orders: Vec<Order> = (0..1000)
        .map(|i| Order::new(Id::new(i), Id::new(i % 10), Id::new(i % 3), 1, 1))
        .collect();
    let filter = domain::Filter::for_client(Id::new(4)).pickup_point_id(Id::new(1));

    c.bench_function("domain/filter_1000_orders", |b| {
        b.iter(|| orders.iter().filter(|o| filter.matches(o)).count());
    });
}

criterion_group!(
    benches,
    bench_resolve_packaging,
    bench_apply_wrapped_packaging,
    bench_filter_matches
);
criterion_main!(benches);
