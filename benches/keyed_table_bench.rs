use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use keyed_table::KeyedTable;
use std::time::Duration;

struct Item {
    name: String,
    payload: u64,
}

fn by_name(it: &Item) -> &str {
    &it.name
}

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn arena(seed: u64, n: usize) -> Vec<Item> {
    lcg(seed)
        .take(n)
        .enumerate()
        .map(|(i, x)| Item {
            name: format!("k{:016x}", x),
            payload: i as u64,
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let items = arena(1, 10_000);
    c.bench_function("keyed_table_insert_10k", |b| {
        b.iter_batched(
            || KeyedTable::with_capacity(by_name, items.len()),
            |mut t| {
                for item in &items {
                    t.insert(item).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let items = arena(7, 20_000);
    let mut t = KeyedTable::new(by_name);
    for item in &items {
        t.insert(item).unwrap();
    }
    let mut it = items.iter().cycle();
    c.bench_function("keyed_table_get_hit", |b| {
        b.iter(|| {
            let item = it.next().unwrap();
            black_box(t.get(&item.name));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let items = arena(11, 10_000);
    let mut t = KeyedTable::new(by_name);
    for item in &items {
        t.insert(item).unwrap();
    }
    let mut miss = lcg(0xdead_beef);
    c.bench_function("keyed_table_get_miss", |b| {
        b.iter(|| {
            // keys from a disjoint seed, vanishingly unlikely to be present
            let k = format!("m{:016x}", miss.next().unwrap());
            black_box(t.get(&k));
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let items = arena(23, 10_000);
    let mut t = KeyedTable::new(by_name);
    for item in &items {
        t.insert(item).unwrap();
    }
    c.bench_function("keyed_table_walk_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for (_, item) in &t {
                sum = sum.wrapping_add(item.payload);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_walk
}
criterion_main!(benches);
