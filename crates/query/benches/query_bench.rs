//! Benchmarks for statement execution.
//!
//! Setup (table creation and loading) runs outside the measured closures.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tabula_query::ast::{ColumnDef, Expr, JoinClause, Select, Statement};
use tabula_query::Executor;
use tabula_storage::{Storage, StorageConfig};
use tempfile::TempDir;

fn setup(rows: i64) -> (TempDir, Executor) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::open(StorageConfig::new(dir.path())).unwrap();
    let exec = Executor::new(Arc::new(storage));

    for (table, key) in [("users", "id"), ("orders", "user_id")] {
        exec.execute(&Statement::CreateTable {
            table: table.into(),
            columns: vec![
                ColumnDef::new(key, "INTEGER"),
                ColumnDef::new("label", "VARCHAR").size(32),
            ],
        })
        .unwrap();
        exec.execute(&Statement::Insert {
            table: table.into(),
            columns: None,
            values: (0..rows)
                .map(|i| vec![Expr::literal(i), Expr::literal(format!("{}{}", table, i))])
                .collect(),
        })
        .unwrap();
    }
    (dir, exec)
}

fn bench_filtered_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_where");
    for size in [100, 1_000, 10_000] {
        let (_dir, exec) = setup(size);
        let stmt = Statement::Select(Select::new("users").columns(["label"]).filter(Expr::and(
            Expr::ge(Expr::identifier("id"), Expr::literal(size / 4)),
            Expr::lt(Expr::identifier("id"), Expr::literal(size / 2)),
        )));
        group.bench_with_input(BenchmarkId::from_parameter(size), &stmt, |b, stmt| {
            b.iter(|| black_box(exec.execute(stmt).unwrap()))
        });
    }
    group.finish();
}

fn bench_nested_loop_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("inner_join");
    group.sample_size(20);
    for size in [50, 200, 500] {
        let (_dir, exec) = setup(size);
        let stmt = Statement::Select(Select::new("users").join(JoinClause::inner(
            "orders",
            Expr::eq(Expr::identifier("users.id"), Expr::identifier("orders.user_id")),
        )));
        group.bench_with_input(BenchmarkId::from_parameter(size), &stmt, |b, stmt| {
            b.iter(|| black_box(exec.execute(stmt).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filtered_select, bench_nested_loop_join);
criterion_main!(benches);
