use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use strbuf::{FixedStrBuf, StrBuf};

fn bench_append_char(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_char");

    for size in [100, 10_000, 1_000_000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("growable", size), size, |b, &size| {
            b.iter(|| {
                let mut buf = StrBuf::new();
                for i in 0..size {
                    buf.append_char(b'a' + (i % 26) as u8).unwrap();
                }
                black_box(buf.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("fixed", size), size, |b, &size| {
            let mut region = vec![0u8; size + 1];
            b.iter(|| {
                let mut buf = FixedStrBuf::new(&mut region);
                for i in 0..size {
                    buf.append_char(b'a' + (i % 26) as u8).unwrap();
                }
                black_box(buf.len())
            });
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for size in [10, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("words", size), size, |b, &size| {
            b.iter(|| {
                let mut buf = StrBuf::new();
                for _ in 0..size {
                    buf.append(black_box("element_")).unwrap();
                }
                black_box(buf.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("reused", size), size, |b, &size| {
            let mut buf = StrBuf::new();
            b.iter(|| {
                buf.clear();
                for _ in 0..size {
                    buf.append(black_box("element_")).unwrap();
                }
                black_box(buf.len())
            });
        });
    }
    group.finish();
}

fn bench_write_fmt(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_fmt");

    for size in [10, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("growable", size), size, |b, &size| {
            b.iter(|| {
                let mut buf = StrBuf::new();
                for i in 0..size {
                    write!(buf, "element_{i:04},").unwrap();
                }
                black_box(buf.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("std_string", size), size, |b, &size| {
            use std::fmt::Write;
            b.iter(|| {
                let mut s = String::new();
                for i in 0..size {
                    write!(s, "element_{i:04},").unwrap();
                }
                black_box(s.len())
            });
        });
    }
    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    let mut buf = StrBuf::new();
    buf.fill(4000, b'x').unwrap();

    group.bench_function("as_str", |b| {
        b.iter(|| black_box(buf.as_str().unwrap().len()));
    });
    group.bench_function("to_str", |b| {
        b.iter(|| black_box(buf.to_str().unwrap()));
    });
    group.bench_function("into_str", |b| {
        b.iter(|| {
            let mut owned = buf.clone();
            black_box(owned.into_str().unwrap())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_append_char,
    bench_append,
    bench_write_fmt,
    bench_extraction
);
criterion_main!(benches);
