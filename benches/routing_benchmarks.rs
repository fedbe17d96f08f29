//! Routing benchmarks for routewise
//!
//! Measures the hot synchronous paths: scoring, candidate ranking, cache key
//! derivation and weighted assignment.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use routewise::config::{ModelConfig, QualityTier, SpeedTier};
use routewise::core::cache::CacheKey;
use routewise::core::router::load_balancer::weighted_assignments;
use routewise::core::router::scoring;
use routewise::core::router::strategy::builtin;
use routewise::core::router::{
    CandidateSelector, RoutingRequest, ServiceMetrics, ServiceMetricsStore, UserConstraints,
};
use std::hint::black_box;

fn store_with(services: usize) -> ServiceMetricsStore {
    let store = ServiceMetricsStore::new();
    let tiers = [
        (QualityTier::Basic, SpeedTier::Fast),
        (QualityTier::Good, SpeedTier::Medium),
        (QualityTier::Excellent, SpeedTier::Slow),
    ];
    for i in 0..services {
        let (quality, speed) = tiers[i % tiers.len()];
        let model = ModelConfig::new(format!("model-{}", i), 0.0001 * (i as f64 + 1.0))
            .with_quality(quality)
            .with_speed(speed);
        store.register(ServiceMetrics::from_model(&format!("provider-{}", i), &model));
    }
    store
}

/// Benchmark the scoring function
fn bench_scoring(c: &mut Criterion) {
    let model = ModelConfig::new("m", 0.002).with_quality(QualityTier::Good);
    let metrics = ServiceMetrics::from_model("p", &model);
    let request = RoutingRequest::new("hello").with_max_tokens(256);
    let strategy = builtin::balanced();

    c.bench_function("score_candidate", |b| {
        b.iter(|| black_box(scoring::score(&metrics, &request, &strategy)))
    });
}

/// Benchmark candidate ranking for growing pools
fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_selection");
    let request = RoutingRequest::new("hello")
        .with_max_tokens(256)
        .with_constraints(UserConstraints {
            max_cost: Some(1.0),
            ..Default::default()
        });

    for services in [4usize, 32, 256] {
        let store = store_with(services);
        group.throughput(Throughput::Elements(services as u64));
        for strategy in [builtin::balanced(), builtin::cost_optimized()] {
            group.bench_with_input(
                BenchmarkId::new(strategy.name.clone(), services),
                &services,
                |b, _| {
                    let selector = CandidateSelector::new(&store);
                    b.iter(|| black_box(selector.select(&request, &strategy).ok()))
                },
            );
        }
    }
    group.finish();
}

/// Benchmark cache key hashing
fn bench_cache_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_key");
    for len in [64usize, 1024, 16 * 1024] {
        let prompt = "x".repeat(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &prompt, |b, prompt| {
            b.iter(|| {
                black_box(CacheKey::compute(
                    prompt,
                    Some("gpt-4o"),
                    Some(0.7),
                    Some(512),
                    "balanced",
                ))
            })
        });
    }
    group.finish();
}

/// Benchmark weighted batch assignment
fn bench_weighted_assignment(c: &mut Criterion) {
    let weights: Vec<f64> = (0..16).map(|i| 0.1 + i as f64 * 0.05).collect();
    let mut group = c.benchmark_group("weighted_assignment");
    for batch in [100usize, 10_000] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(weighted_assignments(&weights, batch, &mut rng)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scoring,
    bench_selection,
    bench_cache_key,
    bench_weighted_assignment
);
criterion_main!(benches);
