use criterion::{black_box, criterion_group, criterion_main, Criterion};
use card_gallery::{core::CardRecord, paginator::ResultPaginator};

fn create_results(count: u64) -> Vec<CardRecord> {
    (0..count)
        .map(|i| CardRecord::new(i, format!("Test Card {}", i)))
        .collect()
}

fn bench_paginate_all(c: &mut Criterion) {
    let results_15 = create_results(15);
    let results_500 = create_results(500);

    c.bench_function("paginate_15_by_12", |b| {
        b.iter(|| {
            let mut paginator = ResultPaginator::new();
            paginator.reset(results_15.clone());
            while paginator.has_more() {
                black_box(paginator.next_page(12));
            }
        });
    });

    c.bench_function("paginate_500_by_12", |b| {
        b.iter(|| {
            let mut paginator = ResultPaginator::new();
            paginator.reset(results_500.clone());
            while paginator.has_more() {
                black_box(paginator.next_page(12));
            }
        });
    });
}

criterion_group!(benches, bench_paginate_all);
criterion_main!(benches);
