//! Session cache benchmarks.
//!
//! Run with: cargo bench -p rescache

use criterion::{criterion_group, criterion_main, Criterion};
use rescache::{LruSessionCache, SessionParams, SystemServerContext};
use rescache_types::HashAlgId;

fn unique_id(counter: u64) -> [u8; 32] {
    let mut id = [0u8; 32];
    id[..8].copy_from_slice(&counter.to_be_bytes());
    id
}

fn filled_cache(
    server: &mut SystemServerContext,
    entries: u64,
) -> (LruSessionCache, u64) {
    let mut cache = LruSessionCache::with_capacity(entries as usize);
    let mut params = SessionParams::default();
    params.version = 0x0303;
    params.cipher_suite = 0xC02F;
    for counter in 0..entries {
        params.session_id = unique_id(counter);
        cache.save(server, &params);
    }
    (cache, entries)
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");
    let mut server = SystemServerContext::new(HashAlgId::Sha256);

    group.bench_function("into_free_slot", |b| {
        // Oversize the store so saves keep appending
        let mut cache = LruSessionCache::with_capacity(1 << 20);
        let mut counter = 0u64;
        let mut params = SessionParams::default();
        b.iter(|| {
            params.session_id = unique_id(counter);
            counter += 1;
            cache.save(&mut server, &params);
        });
    });

    group.bench_function("with_eviction", |b| {
        let (mut cache, mut counter) = filled_cache(&mut server, 1024);
        let mut params = SessionParams::default();
        b.iter(|| {
            params.session_id = unique_id(counter);
            counter += 1;
            cache.save(&mut server, &params);
        });
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    let mut server = SystemServerContext::new(HashAlgId::Sha256);

    group.bench_function("hit", |b| {
        let (mut cache, entries) = filled_cache(&mut server, 1024);
        let mut counter = 0u64;
        let mut params = SessionParams::default();
        b.iter(|| {
            params.session_id = unique_id(counter % entries);
            counter += 1;
            assert!(cache.load(&mut params));
        });
    });

    group.bench_function("miss", |b| {
        let (mut cache, entries) = filled_cache(&mut server, 1024);
        let mut counter = entries;
        let mut params = SessionParams::default();
        b.iter(|| {
            params.session_id = unique_id(counter);
            counter += 1;
            assert!(!cache.load(&mut params));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_save, bench_load);
criterion_main!(benches);
