//! Benchmarks for indicator implementations.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::Bar;
use stockscope_indicators::{Adx, Ema, Kdj, Macd, Rsi, Sma, StochasticRsi};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0)
        .collect()
}

fn generate_bars(size: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    generate_test_data(size)
        .into_iter()
        .enumerate()
        .map(|(i, close)| {
            Bar::new(start + Duration::days(i as i64), close, close + 1.0, close - 1.0, close, 1_000)
        })
        .collect()
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("MovingAverage");

    for size in [250, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma200", size), &data, |b, data| {
            let sma = Sma::new(200);
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema200", size), &data, |b, data| {
            let ema = Ema::new(200);
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_momentum(c: &mut Criterion) {
    let mut group = c.benchmark_group("Momentum");

    for size in [250, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("rsi", size), &data, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("macd", size), &data, |b, data| {
            let macd = Macd::new();
            b.iter(|| macd.calculate_closes(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("stoch_rsi", size), &data, |b, data| {
            let stoch_rsi = StochasticRsi::new();
            b.iter(|| stoch_rsi.calculate_closes(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_bar_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bars");

    for size in [250, 1000, 10000].iter() {
        let bars = generate_bars(*size);

        group.bench_with_input(BenchmarkId::new("adx", size), &bars, |b, bars| {
            let adx = Adx::default();
            b.iter(|| adx.calculate(black_box(bars)))
        });

        group.bench_with_input(BenchmarkId::new("kdj", size), &bars, |b, bars| {
            let kdj = Kdj::new();
            b.iter(|| kdj.calculate(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_moving_averages,
    benchmark_momentum,
    benchmark_bar_indicators
);
criterion_main!(benches);
