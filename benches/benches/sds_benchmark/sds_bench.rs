use std::{fmt::Write, hint::black_box};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zumic_core::Sds;

const SIZES: &[usize] = &[8, 64, 1_024, 65_536];

fn bench_cat(c: &mut Criterion) {
    let mut group = c.benchmark_group("sds/cat_bytewise");

    for &n in SIZES {
        group.throughput(Throughput::Bytes(n as u64));

        group.bench_with_input(BenchmarkId::new("sds", n), &n, |b, &n| {
            b.iter(|| {
                let mut s = Sds::empty();
                for _ in 0..n {
                    s.cat(black_box(b"x"));
                }
                black_box(s)
            });
        });

        group.bench_with_input(BenchmarkId::new("vec", n), &n, |b, &n| {
            b.iter(|| {
                let mut v: Vec<u8> = Vec::new();
                for _ in 0..n {
                    v.extend_from_slice(black_box(b"x"));
                }
                black_box(v)
            });
        });
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    c.bench_function("sds/write_fmt_ints", |b| {
        b.iter(|| {
            let mut s = Sds::empty();
            for i in 0..100 {
                write!(s, "{},", black_box(i)).unwrap();
            }
            black_box(s)
        });
    });

    c.bench_function("sds/from_i64", |b| {
        b.iter(|| black_box(Sds::from_i64(black_box(-1_234_567_890))));
    });
}

fn bench_split(c: &mut Criterion) {
    let fields = vec!["field"; 1_000];
    let csv = Sds::join(fields.as_slice(), b",");
    let line = b"SET \"key with spaces\" 'value' \"\\x41\\x42\" tail";

    c.bench_function("sds/split_len_1000", |b| {
        b.iter(|| black_box(Sds::split_len(black_box(csv.as_slice()), b",")));
    });

    c.bench_function("sds/split_args", |b| {
        b.iter(|| black_box(Sds::split_args(black_box(line))));
    });
}

fn bench_range_trim(c: &mut Criterion) {
    let base = Sds::new("   padded value with some text   ");

    c.bench_function("sds/trim", |b| {
        b.iter_batched(
            || base.clone(),
            |mut s| {
                s.trim(b" ");
                s
            },
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("sds/range", |b| {
        b.iter_batched(
            || base.clone(),
            |mut s| {
                s.range(3, -4);
                s
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_cat, bench_format, bench_split, bench_range_trim);
criterion_main!(benches);
