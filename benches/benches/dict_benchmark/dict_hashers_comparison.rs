use std::{
    hash::{BuildHasher, Hash},
    hint::black_box,
};

use ahash::RandomState as AHashState;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rustc_hash::FxBuildHasher;
use zumic_core::{database::gen_hash_function, DefaultDictType, Dict, DictType};

/// `DictType` поверх любого `BuildHasher`.
#[derive(Clone, Default)]
struct Hashed<S>(S);

impl<K, V, S> DictType<K, V> for Hashed<S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn hash(
        &self,
        key: &K,
    ) -> u64 {
        self.0.hash_one(key)
    }

    fn key_eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool {
        a == b
    }
}

/// xxh64 по байтам ключа, как у строковых типов словаря.
#[derive(Clone, Copy, Default)]
struct Xxh;

impl<V> DictType<u64, V> for Xxh {
    fn hash(
        &self,
        key: &u64,
    ) -> u64 {
        gen_hash_function(&key.to_le_bytes())
    }

    fn key_eq(
        &self,
        a: &u64,
        b: &u64,
    ) -> bool {
        a == b
    }
}

type DictSip = Dict<u64, u64, DefaultDictType>;
type DictAHash = Dict<u64, u64, Hashed<AHashState>>;
type DictFx = Dict<u64, u64, Hashed<FxBuildHasher>>;
type DictXxh = Dict<u64, u64, Xxh>;

const SIZES: &[usize] = &[100, 1_000, 10_000];

fn fill<T: DictType<u64, u64>>(
    d: &mut Dict<u64, u64, T>,
    n: usize,
) {
    for i in 0..n as u64 {
        d.add(black_box(i), black_box(i)).unwrap();
    }
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_insert");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("siphash13", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = DictSip::new();
                fill(&mut d, n);
                d
            });
        });

        group.bench_with_input(BenchmarkId::new("ahash", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = DictAHash::with_type(Hashed(AHashState::new()));
                fill(&mut d, n);
                d
            });
        });

        group.bench_with_input(BenchmarkId::new("fxhash", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = DictFx::with_type(Hashed(FxBuildHasher));
                fill(&mut d, n);
                d
            });
        });

        group.bench_with_input(BenchmarkId::new("xxh64", n), &n, |b, &n| {
            b.iter(|| {
                let mut d = DictXxh::with_type(Xxh);
                fill(&mut d, n);
                d
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("dict_lookup");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        let mut sip = DictSip::new();
        fill(&mut sip, n);
        let mut ahash_d = DictAHash::with_type(Hashed(AHashState::new()));
        fill(&mut ahash_d, n);
        let mut fx = DictFx::with_type(Hashed(FxBuildHasher));
        fill(&mut fx, n);
        let mut xxh = DictXxh::with_type(Xxh);
        fill(&mut xxh, n);

        group.bench_with_input(BenchmarkId::new("siphash13", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(sip.peek(black_box(&i)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("ahash", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(ahash_d.peek(black_box(&i)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("fxhash", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(fx.peek(black_box(&i)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("xxh64", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n as u64 {
                    black_box(xxh.peek(black_box(&i)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup);
criterion_main!(benches);
