//! Criterion benchmarks for tag encoding and decoding.

use std::hint::black_box;

use chrono::{Duration, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use ndntac::{AuthTag, KeyLocator, Name};

fn sample_tag(depth: usize) -> AuthTag {
    let prefix = (0..depth)
        .try_fold(Name::new(), |name, i| {
            name.with_component(format!("segment-{i}").into_bytes())
        })
        .unwrap();
    let mut tag = AuthTag::with_access_level(4)
        .with_prefix(prefix)
        .with_key_locator(KeyLocator::Name(Name::parse("/provider/KEY/1").unwrap()))
        .with_signature_value(vec![0x42; 64]);
    tag.set_consumer_locator(Some(KeyLocator::KeyDigest(vec![7; 32])));
    tag.set_expiration_time(Utc::now() + Duration::hours(1));
    tag
}

/// Benchmark: encoding with a cold cache versus a warm one
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for depth in [1, 4, 16] {
        let tag = sample_tag(depth);
        group.throughput(Throughput::Bytes(tag.wire_encode().len() as u64));

        group.bench_with_input(BenchmarkId::new("cold", depth), &tag, |b, tag| {
            b.iter_batched(
                || {
                    let mut fresh = tag.clone();
                    fresh.set_route_hash(0);
                    fresh
                },
                |fresh| black_box(fresh.wire_encode().len()),
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("cached", depth), &tag, |b, tag| {
            b.iter(|| black_box(tag.wire_encode().len()));
        });
    }

    group.finish();
}

/// Benchmark: decoding
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for depth in [1, 4, 16] {
        let wire = sample_tag(depth).wire_encode().to_vec();
        group.throughput(Throughput::Bytes(wire.len() as u64));
        group.bench_with_input(BenchmarkId::new("auth_tag", depth), &wire, |b, wire| {
            b.iter(|| AuthTag::from_wire(black_box(wire)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
