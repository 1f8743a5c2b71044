//! Benchmarks for tabula-index using criterion.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tabula_core::Value;
use tabula_index::BTree;

fn populated(size: i64) -> BTree {
    let tree = BTree::new("id");
    for i in 0..size {
        tree.insert(Value::Integer(i), i as usize).unwrap();
    }
    tree
}

fn btree_insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_insert");

    for size in [100i64, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(populated(size)));
        });
    }

    group.finish();
}

fn btree_search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_search");

    for size in [100i64, 1000, 10000].iter() {
        let tree = populated(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                for i in (0..100).map(|x| x * size / 100) {
                    black_box(tree.search(&Value::Integer(i)).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn btree_delete_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_delete");

    for delete_count in [100i64, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(delete_count),
            delete_count,
            |b, &delete_count| {
                b.iter_batched(
                    || populated(10000),
                    |tree| {
                        for i in 0..delete_count {
                            tree.delete(&Value::Integer(i)).unwrap();
                        }
                        black_box(tree)
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn btree_get_all_benchmark(c: &mut Criterion) {
    let tree = populated(10000);
    c.bench_function("btree_get_all_10000", |b| {
        b.iter(|| black_box(tree.get_all()));
    });
}

criterion_group!(
    benches,
    btree_insert_benchmark,
    btree_search_benchmark,
    btree_delete_benchmark,
    btree_get_all_benchmark,
);
criterion_main!(benches);
