//! Criterion benchmarks for the admission pipeline and verification cache.

use std::hint::black_box;

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use ndntac::{AuthTag, Data, KeyLocator, Name, Signature};
use ndntac_router::{AdmissionPipeline, AuthCache, RouterConfig};

fn key() -> KeyLocator {
    KeyLocator::Name(Name::parse("/provider/KEY/1").unwrap())
}

fn data() -> Data {
    Data::new(Name::parse("/provider/video/ep1/seg3").unwrap())
        .with_access_level(2)
        .with_content(vec![0u8; 1024])
        .with_signature(Signature::new().with_key_locator(key()).with_value(vec![1; 64]))
}

fn tag(route_hash: u64, signature: Vec<u8>) -> AuthTag {
    let mut tag = AuthTag::with_access_level(2)
        .with_prefix(Name::parse("/provider/video").unwrap())
        .with_key_locator(key())
        .with_signature_value(signature);
    tag.set_route_hash(route_hash);
    tag
}

/// Benchmark: one admission decision per path
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let data = data();

    let mut pipeline = AdmissionPipeline::from_config(&RouterConfig::default().with_rng_seed(0))
        .expect("default config is valid");
    let cached = tag(1, vec![0x42; 64]);
    pipeline.auth_cache_mut().insert(&cached);
    group.bench_function("cache_hit", |b| {
        b.iter(|| black_box(pipeline.evaluate(&cached, &data, 0, Utc::now())));
    });

    // A sentinel signature is never cached, so every call verifies.
    let forged = tag(2, vec![0; 64]);
    group.bench_function("signature_denied", |b| {
        b.iter(|| black_box(pipeline.evaluate(&forged, &data, 0, Utc::now())));
    });

    let delegated = tag(3, vec![0x42; 64]);
    group.bench_function("delegated", |b| {
        b.iter(|| black_box(pipeline.evaluate(&delegated, &data, u32::MAX, Utc::now())));
    });

    group.finish();
}

/// Benchmark: bloom filter membership at increasing fill
fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("auth_cache");

    for filled in [0u64, 1_000, 10_000] {
        let mut cache = AuthCache::new(1e-10, 10_000).expect("valid parameters");
        for route_hash in 0..filled {
            cache.insert(&tag(route_hash, vec![1]));
        }
        let probe = tag(u64::MAX, vec![1]);
        group.bench_with_input(BenchmarkId::new("contains", filled), &probe, |b, probe| {
            b.iter(|| black_box(cache.contains(probe)));
        });
    }

    group.bench_function("insert", |b| {
        let mut cache = AuthCache::new(0.01, 1_000).expect("valid parameters");
        let tag = tag(7, vec![1]);
        b.iter(|| cache.insert(black_box(&tag)));
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_cache);
criterion_main!(benches);
