use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use zumic_core::{pqsort, IntSet};

fn set_from(base: i64) -> IntSet {
    (0..10_000).map(|i| base + i).collect()
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("intset/contains");
    let encodings = [
        ("int16", 0i64),
        ("int32", i16::MAX as i64 + 1_000),
        ("int64", i32::MAX as i64 + 1_000),
    ];

    for (name, base) in encodings {
        let set = set_from(base);
        group.throughput(Throughput::Elements(10_000));
        group.bench_with_input(BenchmarkId::from_parameter(name), &set, |b, set| {
            b.iter(|| {
                for i in 0..10_000 {
                    black_box(set.contains(black_box(base + i)));
                }
            });
        });
    }

    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("intset/add");

    group.bench_function("ascending_10k", |b| {
        b.iter(|| black_box(set_from(0)));
    });

    group.bench_function("random_1k", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        let values: Vec<i64> = (0..1_000).map(|_| rng.gen_range(-30_000..30_000)).collect();
        b.iter(|| {
            let mut set = IntSet::new();
            for &v in &values {
                set.add(black_box(v));
            }
            black_box(set)
        });
    });

    group.bench_function("upgrade_int16_to_int64", |b| {
        b.iter_batched(
            || set_from(0),
            |mut set| {
                set.add(black_box(i64::MAX));
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_pqsort(c: &mut Criterion) {
    let mut group = c.benchmark_group("pqsort");
    let mut rng = SmallRng::seed_from_u64(7);
    let data: Vec<u32> = (0..100_000).map(|_| rng.gen()).collect();

    for (l, r) in [(0usize, 9usize), (50_000, 50_099), (0, 99_999)] {
        group.bench_with_input(
            BenchmarkId::new("range", format!("{l}..={r}")),
            &(l, r),
            |b, &(l, r)| {
                b.iter_batched(
                    || data.clone(),
                    |mut v| {
                        pqsort(&mut v, l, r);
                        v
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.bench_function("std_sort_unstable", |b| {
        b.iter_batched(
            || data.clone(),
            |mut v| {
                v.sort_unstable();
                v
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_contains, bench_add, bench_pqsort);
criterion_main!(benches);
