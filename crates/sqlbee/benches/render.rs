use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlbee::{Operand, Operator, Statement, Table, Value, chunk_in_list, query};

/// SELECT with one join and `n` equality predicates.
fn build_statement(n: usize) -> Statement {
    let mut qb = query();
    qb.table("TABLE1", "T1")
        .inner_join(Table::new("TABLE2", "T2"))
        .on("T1.ID", "T2.ID")
        .end();
    for i in 0..n {
        qb.condition_op(Operator::Eq)
            .left(format!("T1.COL{i}"))
            .value(i as i64)
            .end();
    }
    qb.order_by("T1.ID").desc().end();
    qb.build().expect("bench statement")
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/output");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_statement(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.render()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_and_render");

    for n in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_statement(n).render()));
        });
    }

    group.finish();
}

fn bench_chunk_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/chunk_in_list");
    let left = Operand::column("T1.ID");

    for n in [10, 1000, 2235, 10_000] {
        let values: Vec<Value> = (0..n as i64).map(Value::from).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| black_box(chunk_in_list(&left, values, 1000)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_build_and_render,
    bench_chunk_in_list
);
criterion_main!(benches);
