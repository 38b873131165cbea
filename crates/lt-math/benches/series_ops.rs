use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lt_math::{first_difference, mode, prefix_sum};

fn cumulative_series(len: usize) -> Vec<Option<i64>> {
    (0..len as i64).map(|i| Some(i * 7 + i % 3)).collect()
}

fn bench_series(c: &mut Criterion) {
    let series = cumulative_series(1_000);

    c.bench_function("first_difference_1000", |b| {
        b.iter(|| first_difference(black_box(&series)))
    });

    let deltas = first_difference(&series).unwrap_or_default();
    c.bench_function("prefix_sum_1000", |b| b.iter(|| prefix_sum(black_box(&deltas))));

    c.bench_function("mode_1000", |b| {
        b.iter(|| mode(black_box(&deltas).iter().copied()))
    });
}

criterion_group!(benches, bench_series);
criterion_main!(benches);
