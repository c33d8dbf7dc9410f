//! Mining throughput over synthetic databases
//!
//! Guards against performance regressions in projection and the closure
//! oracle, which dominate the runtime.

use cerrado::database::SequenceDatabase;
use cerrado::loader;
use cerrado::miner::BidePlus;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn synthetic_raw(sequences: usize, itemsets: usize, alphabet: u32, seed: u64) -> Vec<Vec<Vec<u32>>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..sequences)
        .map(|_| {
            (0..itemsets)
                .map(|_| {
                    let size = rng.gen_range(1..=3);
                    let mut items: Vec<u32> = Vec::with_capacity(size);
                    while items.len() < size {
                        let item = rng.gen_range(1..=alphabet);
                        if !items.contains(&item) {
                            items.push(item);
                        }
                    }
                    items.sort_unstable();
                    items
                })
                .collect()
        })
        .collect()
}

fn bench_mining(c: &mut Criterion) {
    let database = SequenceDatabase::from_itemsets(synthetic_raw(80, 6, 15, 42));

    let mut group = c.benchmark_group("mining");
    for minsup in [16usize, 32, 48] {
        group.bench_with_input(BenchmarkId::from_parameter(minsup), &minsup, |b, &minsup| {
            b.iter(|| {
                let outcome = BidePlus::new(minsup)
                    .run(black_box(&database), None)
                    .expect("mining failed");
                black_box(outcome.stats.pattern_count);
            });
        });
    }
    group.finish();
}

fn bench_loading(c: &mut Criterion) {
    let mut text = String::new();
    for sequence in synthetic_raw(200, 8, 30, 7) {
        for itemset in sequence {
            for item in itemset {
                text.push_str(&format!("{item} "));
            }
            text.push_str("-1 ");
        }
        text.push_str("-2\n");
    }

    c.bench_function("load_reader", |b| {
        b.iter(|| {
            let database = loader::load_reader(black_box(text.as_bytes())).expect("load failed");
            black_box(database.len());
        });
    });
}

criterion_group!(benches, bench_mining, bench_loading);
criterion_main!(benches);
