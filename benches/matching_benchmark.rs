use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use matching_core::{JsonCodec, MemorySink, Order, OrderBook};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

const PRODUCT: u64 = 1;

// Populates a book with randomized limit orders split across both sides,
// the way the legacy matching benchmark seeded its million-order book.
fn seeded_engine(orders: u64, seed: u64) -> OrderBook {
    let engine = OrderBook::with_collaborators(0.05, JsonCodec, Arc::new(MemorySink::new()));
    let mut rng = StdRng::seed_from_u64(seed);

    for id in 0..orders {
        let price = rng.gen_range(1.0..100.0);
        let amount = rng.gen_range(0.1..10.0);
        let order = Order::limit(id, PRODUCT, price, amount).with_priority(rng.gen_range(0..10));
        if id % 2 == 0 {
            engine.add_buy(order);
        } else {
            engine.add_sell(order);
        }
    }
    engine
}

fn match_pass_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Matching pass");

    for &book_size in &[100u64, 1_000] {
        group.bench_function(format!("full pass over {book_size} resting orders"), |b| {
            b.iter_batched(
                || seeded_engine(book_size, 42),
                |engine| {
                    engine.match_orders(black_box(PRODUCT));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn price_update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Price update");

    group.bench_function("tolerance filter over 1000 resting orders", |b| {
        b.iter_batched(
            || seeded_engine(1_000, 7),
            |engine| {
                engine.update_price(black_box(PRODUCT), black_box(50.0));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, match_pass_benchmark, price_update_benchmark);
criterion_main!(benches);
