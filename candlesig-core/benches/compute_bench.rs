//! Criterion benchmarks for the compute phase.
//!
//! Benchmarks:
//! 1. Indicator snapshot (all 19 columns)
//! 2. Support/resistance detection
//! 3. Full pipeline (snapshot + levels + evaluation) for one pair

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use candlesig_core::domain::{Candle, CandleSeries, Timeframe, TrendBias};
use candlesig_core::indicators::{compute_indicators, Ema, Indicator, Rsi};
use candlesig_core::{analyze_with_bias, detect_levels, LevelParams, PipelineParams};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    let base = chrono::DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.01;
            let open = close - 0.3;
            Candle {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: close + 1.5,
                low: open - 1.5,
                close,
                volume: 1_000.0 + (i % 500) as f64,
            }
        })
        .collect()
}

// ── 1. Indicator Snapshot ────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_snapshot");

    for &count in &[210, 500, 2000] {
        let candles = make_candles(count);

        let ema = Ema::new(200);
        group.bench_with_input(BenchmarkId::new("ema_200", count), &count, |b, _| {
            b.iter(|| ema.compute(black_box(&candles)));
        });

        let rsi = Rsi::new(14);
        group.bench_with_input(BenchmarkId::new("rsi_14", count), &count, |b, _| {
            b.iter(|| rsi.compute(black_box(&candles)));
        });

        group.bench_with_input(BenchmarkId::new("full_snapshot", count), &count, |b, _| {
            b.iter(|| compute_indicators(black_box(&candles)));
        });
    }

    group.finish();
}

// ── 2. Levels ────────────────────────────────────────────────────────

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("levels");
    let params = LevelParams::default();

    for &count in &[210, 2000] {
        let candles = make_candles(count);
        group.bench_with_input(BenchmarkId::new("detect", count), &count, |b, _| {
            b.iter(|| detect_levels(black_box(&candles), &params));
        });
    }

    group.finish();
}

// ── 3. Full Pipeline ─────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let params = PipelineParams::default();

    let series = CandleSeries::new("BENCH", Timeframe::H1, make_candles(500))
        .unwrap_or_else(|e| panic!("bench series: {e}"));
    group.bench_function("analyze_500", |b| {
        b.iter(|| analyze_with_bias(black_box(&series), TrendBias::Bullish, &params));
    });

    group.finish();
}

criterion_group!(benches, bench_indicators, bench_levels, bench_pipeline);
criterion_main!(benches);
