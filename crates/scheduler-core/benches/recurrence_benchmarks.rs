use chrono::{NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scheduler_core::recurrence::{next_date, RecurrenceRule};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 6, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn bench_rule_parsing(c: &mut Criterion) {
    c.bench_function("rule_parsing", |b| {
        b.iter(|| black_box("d 14").parse::<RecurrenceRule>().unwrap())
    });
}

fn bench_day_rule_catch_up(c: &mut Criterion) {
    let mut group = c.benchmark_group("day_rule_catch_up");

    // The older the base date, the more intervals have to be skipped.
    for base in ["20300601", "20200101", "19000101"] {
        group.bench_with_input(BenchmarkId::from_parameter(base), &base, |b, base| {
            b.iter(|| next_date(black_box(now()), black_box(base), black_box("d 3")).unwrap())
        });
    }

    group.finish();
}

fn bench_year_rule_catch_up(c: &mut Criterion) {
    let mut group = c.benchmark_group("year_rule_catch_up");

    for base in ["20290615", "19040229"] {
        group.bench_with_input(BenchmarkId::from_parameter(base), &base, |b, base| {
            b.iter(|| next_date(black_box(now()), black_box(base), black_box("y")).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rule_parsing,
    bench_day_rule_catch_up,
    bench_year_rule_catch_up
);
criterion_main!(benches);
