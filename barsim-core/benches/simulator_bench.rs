//! Criterion benchmarks for the simulator loop.
//!
//! Benchmarks:
//! 1. Scripted signals (loop and bookkeeping cost only)
//! 2. SMA crossover (per-bar indicator evaluation over the history slice)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use barsim_core::strategies::{MaCrossover, SignalSeries};
use barsim_core::{simulate, Bar, Signal};

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::from_close(base_date + chrono::Duration::days(i as i64), close)
        })
        .collect()
}

fn alternating_signals(n: usize) -> Vec<Signal> {
    (0..n)
        .map(|i| match i % 10 {
            0 => Signal::Buy,
            5 => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect()
}

fn bench_simulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    for &n in &[252usize, 2_520, 25_200] {
        let bars = make_bars(n);
        let scripted = SignalSeries::new(alternating_signals(n));
        group.bench_with_input(BenchmarkId::new("scripted", n), &bars, |b, bars| {
            b.iter(|| simulate(black_box(bars), &scripted, 100_000.0))
        });

        let crossover = MaCrossover::new(10, 50).unwrap();
        group.bench_with_input(BenchmarkId::new("ma_crossover", n), &bars, |b, bars| {
            b.iter(|| simulate(black_box(bars), &crossover, 100_000.0))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulator);
criterion_main!(benches);
