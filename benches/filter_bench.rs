use criterion::{black_box, criterion_group, criterion_main, Criterion};
use whereclause::*;

fn make_rows(n: i64) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let row = Row::new().with("id", i);
            match i % 4 {
                0 => row.with("name", "small").with("value", i),
                1 => row.with("name", "big").with("value", i * 10),
                2 => row.with("name", "BIG").with("value", i * 100),
                _ => row.with("name", Value::Null).with("value", Value::Null),
            }
        })
        .collect()
}

fn bench_filter_records(c: &mut Criterion) {
    let rows = make_rows(10_000);
    let conds = Conditions::new()
        .with("name", Operator::insensitive("big"))
        .with("value", Operator::gte(100));

    c.bench_function("filter_records", |b| {
        b.iter(|| filter_records(black_box(&rows), black_box(&conds), false))
    });
    c.bench_function("filter_records_negated", |b| {
        b.iter(|| filter_records(black_box(&rows), black_box(&conds), true))
    });

    let regex = Conditions::new().with("name", Operator::iregex("^b.g$").unwrap());
    c.bench_function("filter_records_regex", |b| {
        b.iter(|| filter_records(black_box(&rows), black_box(&regex), false))
    });
}

fn bench_convert_and_compile(c: &mut Criterion) {
    let patterns = ["^big$", "^bi.*", "this.that", r"^a\.b.*c$", "a[a-z]*b", "^file[.]txt$"];
    c.bench_function("convert_regex", |b| {
        b.iter(|| {
            for pattern in patterns {
                let _ = convert_regex(black_box(pattern), false);
            }
        })
    });

    let compiler = FragmentCompiler::new(Settings::default());
    let conds = Conditions::new()
        .with("value", Operator::lte(10))
        .with("name", Operator::iregex("^Bi.*").unwrap())
        .with("id", vec![1, 2, 3]);
    c.bench_function("compile_all", |b| {
        b.iter(|| {
            let _ = compiler.compile_all(black_box(&conds));
        })
    });
}

criterion_group!(benches, bench_filter_records, bench_convert_and_compile);
criterion_main!(benches);
