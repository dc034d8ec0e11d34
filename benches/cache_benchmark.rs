use criterion::{black_box, criterion_group, criterion_main, Criterion};
use card_gallery::{cache::QueryCache, core::CardRecord};

fn cards(n: u64) -> Vec<CardRecord> {
    (0..n)
        .map(|i| {
            CardRecord::new(i, format!("Card {}", i)).with_image(
                Some("https://images.example/cards/1.jpg"),
                Some("https://images.example/cards_small/1.jpg"),
            )
        })
        .collect()
}

fn setup_cache() -> QueryCache {
    let cache = QueryCache::new(100);

    // Populate with test data
    for i in 0..50 {
        cache.put(&format!("query{}", i), cards(20));
    }

    cache
}

fn bench_cache_get(c: &mut Criterion) {
    let cache = setup_cache();

    c.bench_function("cache_get_hit", |b| {
        b.iter(|| black_box(cache.get("  QUERY25 ")))
    });

    c.bench_function("cache_get_miss", |b| {
        b.iter(|| black_box(cache.get("nonexistent")))
    });
}

fn bench_cache_put(c: &mut Criterion) {
    let cache = QueryCache::new(50);
    let results = cards(20);

    c.bench_function("cache_put_overwrite", |b| {
        b.iter(|| cache.put(black_box("blue-eyes"), results.clone()))
    });
}

fn bench_cache_sweep(c: &mut Criterion) {
    c.bench_function("cache_sweep_full", |b| {
        b.iter_batched(
            || {
                let cache = QueryCache::new(50);
                for i in 0..51 {
                    cache.put(&format!("query{}", i), cards(1));
                }
                cache
            },
            |cache| black_box(cache.maybe_evict_all()),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_card_record_serialization(c: &mut Criterion) {
    let mut card = CardRecord::new(89631139, "Blue-Eyes White Dragon").with_image(
        Some("https://images.ygoprodeck.com/images/cards/89631139.jpg"),
        Some("https://images.ygoprodeck.com/images/cards_small/89631139.jpg"),
    );
    card.card_type = "Normal Monster".to_string();
    card.atk = Some(3000);
    card.def = Some(2500);
    card.level = Some(8);

    c.bench_function("card_record_to_json", |b| {
        b.iter(|| black_box(card.to_json().unwrap()));
    });

    let json = card.to_json().unwrap();
    c.bench_function("card_record_from_json", |b| {
        b.iter(|| black_box(CardRecord::from_json(&json).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_cache_get,
    bench_cache_put,
    bench_cache_sweep,
    bench_card_record_serialization
);
criterion_main!(benches);
