use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rankpilot_runtime::cache::{CacheKeyGenerator, ResultCache};
use rankpilot_runtime::{FixedWindowLimiter, RateQuota};

fn cache_ops(c: &mut Criterion) {
    let cache = ResultCache::new(Duration::from_secs(3600));
    let keys = CacheKeyGenerator::new();
    let key = keys.generate("seo tips", "en", 10);
    cache.put(key.clone(), vec![1u32, 2, 3]);

    c.bench_function("cache_get_hit", |b| b.iter(|| black_box(cache.get(&key))));
    c.bench_function("cache_key_generate", |b| {
        b.iter(|| black_box(keys.generate("seo tips", "en", 10)))
    });
    c.bench_function("cache_set", |b| {
        b.iter(|| cache.put(black_box(key.clone()), black_box(vec![1u32, 2, 3])))
    });
}

fn limiter_ops(c: &mut Criterion) {
    let limiter = FixedWindowLimiter::new();
    let quota = RateQuota::new(u32::MAX, Duration::from_secs(60));
    c.bench_function("limiter_check_and_increment", |b| {
        b.iter(|| black_box(limiter.check_and_increment("user-1", "keyword_suggest", &quota)))
    });
}

criterion_group!(benches, cache_ops, limiter_ops);
criterion_main!(benches);
