//! Memory persister benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use entipersist_bench::{random_carts, random_users, runtime};
use entipersist_core::{Persister, Value, Where};
use entipersist_memory::MemoryPersister;
use entipersist_testkit::{carts_metadata, setup_metadata, users_metadata};

/// Creates a persister holding `count` users with `carts` carts each.
fn populated(rt: &tokio::runtime::Runtime, count: usize, carts: usize) -> MemoryPersister {
    let persister = MemoryPersister::new();
    setup_metadata(&persister);
    rt.block_on(async {
        let users = persister
            .insert_all(&users_metadata(), &random_users(count))
            .await
            .unwrap();
        let ids: Vec<Value> = users.iter().filter_map(|u| u.get("id").cloned()).collect();
        persister
            .insert_all(&carts_metadata(), &random_carts(&ids, carts))
            .await
            .unwrap();
    });
    persister
}

/// Benchmark batch inserts.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_insert");
    let rt = runtime();
    let metadata = users_metadata();

    for count in [10, 100, 1000] {
        let users = random_users(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("insert_all", count), &users, |b, users| {
            b.iter(|| {
                let persister = MemoryPersister::new();
                setup_metadata(&persister);
                rt.block_on(async {
                    black_box(persister.insert_all(&metadata, users).await.unwrap());
                });
            });
        });
    }

    group.finish();
}

/// Benchmark reads with relation population.
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_read");
    let rt = runtime();
    let metadata = users_metadata();

    for count in [100, 1000] {
        let persister = populated(&rt, count, 3);
        let oulu = Where::property_equals("city", "Oulu");

        group.bench_with_input(BenchmarkId::new("count", count), &oulu, |b, cond| {
            b.iter(|| {
                rt.block_on(async {
                    black_box(persister.count(&metadata, Some(cond)).await.unwrap())
                })
            });
        });

        group.bench_with_input(BenchmarkId::new("find_all", count), &oulu, |b, cond| {
            b.iter(|| {
                rt.block_on(async {
                    black_box(persister.find_all(&metadata, Some(cond), None).await.unwrap())
                })
            });
        });

        let first = Where::property_equals("id", "1");
        group.bench_with_input(BenchmarkId::new("find_by_id", count), &first, |b, cond| {
            b.iter(|| {
                rt.block_on(async {
                    black_box(persister.find_by(&metadata, cond, None).await.unwrap())
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_read);

criterion_main!(benches);
