use std::{collections::HashMap, hint::black_box, time::Duration};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zumic_core::Dict;

const SIZES: &[usize] = &[256, 1_024, 8_192, 65_536];
const SHRINK_BASE: u64 = 4_096;

fn bench_insert_with_rehash(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/insert_no_prealloc");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("dict", n), &n, |b, &n| {
            b.iter(|| {
                let mut d: Dict<u64, u64> = Dict::new();
                for i in 0..n as u64 {
                    d.add(black_box(i), black_box(i)).unwrap();
                }
                black_box(d)
            });
        });

        group.bench_with_input(BenchmarkId::new("std_hashmap", n), &n, |b, &n| {
            b.iter(|| {
                let mut m: HashMap<u64, u64> = HashMap::new();
                for i in 0..n as u64 {
                    m.insert(black_box(i), black_box(i));
                }
                black_box(m)
            });
        });
    }

    group.finish();
}

fn bench_insert_with_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/insert_with_capacity");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut d: Dict<u64, u64> = Dict::with_capacity(n).unwrap();
                for i in 0..n as u64 {
                    d.add(black_box(i), black_box(i)).unwrap();
                }
                black_box(d)
            });
        });
    }

    group.finish();
}

/// Стоимость одного шага рехеширования на разных размерах.
fn bench_rehash_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/steps");

    for &n in SIZES {
        group.bench_with_input(BenchmarkId::new("rehash_100", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut d: Dict<u64, u64> = Dict::new();
                    for i in 0..n as u64 {
                        d.add(i, i).unwrap();
                    }
                    while d.rehash(1_000) {}
                    d.expand(n * 4).unwrap();
                    d
                },
                |mut d| {
                    black_box(d.rehash(black_box(100)));
                    d
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("rehash_for_1ms", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut d: Dict<u64, u64> = Dict::new();
                    for i in 0..n as u64 {
                        d.add(i, i).unwrap();
                    }
                    while d.rehash(1_000) {}
                    d.expand(n * 4).unwrap();
                    d
                },
                |mut d| {
                    black_box(d.rehash_for(Duration::from_millis(1)));
                    d
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_find_during_rehash(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/find");
    let n = 65_536u64;

    let mut stable: Dict<u64, u64> = Dict::new();
    for i in 0..n {
        stable.add(i, i).unwrap();
    }
    while stable.rehash(1_000) {}

    group.throughput(Throughput::Elements(n));
    group.bench_function("peek_stable", |b| {
        b.iter(|| {
            for i in 0..n {
                black_box(stable.peek(black_box(&i)));
            }
        });
    });

    group.bench_function("find_while_rehashing", |b| {
        b.iter_batched(
            || {
                let mut d = stable.clone();
                d.expand(n as usize * 4).unwrap();
                d
            },
            |mut d| {
                for i in 0..n {
                    black_box(d.find(black_box(&i)).is_some());
                }
                d
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/scan");

    for &n in SIZES {
        let mut d: Dict<u64, u64> = Dict::new();
        for i in 0..n as u64 {
            d.add(i, i).unwrap();
        }
        while d.rehash(1_000) {}

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("full_scan", n), &d, |b, d| {
            b.iter(|| {
                let mut sum = 0u64;
                let mut cursor = 0;
                loop {
                    cursor = d.scan(cursor, |_, v| sum = sum.wrapping_add(*v));
                    if cursor == 0 {
                        break;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("iter", n), &d, |b, d| {
            b.iter(|| black_box(d.iter().map(|(_, v)| *v).fold(0u64, u64::wrapping_add)));
        });
    }

    group.finish();
}

fn bench_shrink(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/resize");

    for keep in [SHRINK_BASE / 20, SHRINK_BASE / 10] {
        group.bench_with_input(BenchmarkId::new("resize", keep), &keep, |b, &keep| {
            b.iter_batched(
                || {
                    let mut d: Dict<u64, u64> = Dict::new();
                    for i in 0..SHRINK_BASE {
                        d.add(i, i).unwrap();
                    }
                    for i in keep..SHRINK_BASE {
                        d.delete(&i).unwrap();
                    }
                    while d.rehash(1_000) {}
                    d
                },
                |mut d| {
                    d.resize().unwrap();
                    while d.rehash(100) {}
                    black_box(d)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_with_rehash,
    bench_insert_with_capacity,
    bench_rehash_steps,
    bench_find_during_rehash,
    bench_scan,
    bench_shrink,
);
criterion_main!(benches);
