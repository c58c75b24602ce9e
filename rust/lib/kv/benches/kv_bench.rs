use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use garage_kv::{KVStore, RedbStore};

fn bench_redb_set(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    c.bench_function("redb_set", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("warranty/codes/{:016}", i);
            store.set(black_box(&key), black_box(b"{}")).unwrap();
            i += 1;
        });
    });
}

fn bench_redb_create(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    c.bench_function("redb_create", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("warranty/codes/{:016}", i);
            store.create(black_box(&key), black_box(b"{}")).unwrap();
            i += 1;
        });
    });
}

fn bench_redb_scan(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    for i in 0..1000 {
        let key = format!("warranty/codes/{:016}", 2378561284420001u64 + i);
        store.set(&key, b"{}").unwrap();
    }

    c.bench_function("redb_scan_1000", |b| {
        b.iter(|| {
            let results = store.scan(black_box("warranty/codes/")).unwrap();
            assert_eq!(results.len(), 1000);
        });
    });
}

criterion_group!(benches, bench_redb_set, bench_redb_create, bench_redb_scan);
criterion_main!(benches);
