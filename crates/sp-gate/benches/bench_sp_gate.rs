use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use serde_json::{json, Value};
use sp_gate::{build_key, GateConfig, RateLimiter, SuggestionBackend, SuggestionGateway, TtlCache};
use std::time::Duration;

struct StaticBackend;

impl SuggestionBackend for StaticBackend {
    fn suggest(&self, _prompt: &str) -> anyhow::Result<Value> {
        Ok(json!({ "suggestion": "ok" }))
    }
}

fn random_clients(n: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| format!("client-{}", rng.gen_range(0..10_000))).collect()
}

fn bench_key(c: &mut Criterion) {
    let text = "Rewrite this prompt so the model answers in JSON. ".repeat(40);
    c.bench_function("build_key_2k", |b| {
        b.iter(|| black_box(build_key("v3.2", "gpt-4o-mini", "client-1", black_box(&text))))
    });
}

fn bench_cache(c: &mut Criterion) {
    let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(600), 500);
    let keys = random_clients(2000);
    c.bench_function("cache_set_get_500_cap", |b| {
        b.iter(|| {
            for k in &keys {
                cache.set(k.as_str(), k.clone());
                black_box(cache.get(k));
            }
        })
    });
}

fn bench_limiter(c: &mut Criterion) {
    let limiter = RateLimiter::new(30, Duration::from_secs(60));
    let clients = random_clients(1000);
    c.bench_function("limiter_allow_1000_clients", |b| {
        b.iter(|| {
            for id in &clients {
                black_box(limiter.allow(id));
            }
        })
    });
}

fn bench_gateway(c: &mut Criterion) {
    let mut config = GateConfig::default();
    config.rate_limit.max_requests = u32::MAX;
    let gw = SuggestionGateway::new(config, StaticBackend).unwrap_or_else(|e| panic!("{}", e));
    let _ = gw.suggest("bench", "warm prompt");
    c.bench_function("gateway_cached_suggest", |b| {
        b.iter(|| black_box(gw.suggest("bench", black_box("warm prompt")).is_ok()))
    });
}

criterion_group!(benches, bench_key, bench_cache, bench_limiter, bench_gateway);
criterion_main!(benches);
