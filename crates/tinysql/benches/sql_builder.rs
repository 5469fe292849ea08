use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tinysql::{Builder, Connection, ExecResult, OrmResult, Rows, SqlLog, Value};

/// Rendering only; nothing is ever executed.
struct NullConnection;

impl Connection for NullConnection {
    async fn execute(&self, _sql: &str, _params: &[Value]) -> OrmResult<ExecResult> {
        Ok(ExecResult::default())
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> OrmResult<Rows> {
        Ok(Rows::default())
    }

    async fn begin(&self) -> OrmResult<()> {
        Ok(())
    }

    async fn commit(&self) -> OrmResult<()> {
        Ok(())
    }

    async fn rollback(&self) -> OrmResult<()> {
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        false
    }

    fn sql_log(&self) -> SqlLog {
        SqlLog::disabled()
    }
}

/// `select col0,col1,.. from t where col0=? and col1=? ..`
fn fill(b: &mut Builder<'_, NullConnection>, n: usize) {
    b.from("t");
    for i in 0..n {
        let col = format!("col{i}");
        b.select(&col).and_where(&col, i as i64);
    }
}

fn bench_build_select(c: &mut Criterion) {
    let conn = NullConnection;
    let mut group = c.benchmark_group("sql_builder/build_select");

    for n in [1, 5, 10, 50, 100] {
        let mut b = conn.builder();
        fill(&mut b, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &b, |bench, b| {
            bench.iter(|| black_box(b.build_select()));
        });
    }

    group.finish();
}

fn bench_chain_and_render(c: &mut Criterion) {
    let conn = NullConnection;
    let mut group = c.benchmark_group("sql_builder/chain_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let mut b = conn.builder();
                fill(&mut b, n);
                black_box(b.build_select())
            });
        });
    }

    group.finish();
}

fn bench_where_in(c: &mut Criterion) {
    let conn = NullConnection;
    let mut group = c.benchmark_group("sql_builder/where_in");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |bench, values| {
            bench.iter(|| {
                let mut b = conn.builder();
                b.from("t").and_where_in("id", values.iter().copied());
                black_box(b.build_select())
            });
        });
    }

    group.finish();
}

fn bench_nested_groups(c: &mut Criterion) {
    let conn = NullConnection;
    let mut group = c.benchmark_group("sql_builder/nested_groups");

    for depth in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |bench, &depth| {
            bench.iter(|| {
                let mut b = conn.builder();
                b.from("t");
                for i in 0..depth {
                    b.group_start().and_where("a", i).or_where("b", i);
                }
                for _ in 0..depth {
                    b.group_end();
                }
                black_box(b.build_select())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_select,
    bench_chain_and_render,
    bench_where_in,
    bench_nested_groups
);
criterion_main!(benches);
