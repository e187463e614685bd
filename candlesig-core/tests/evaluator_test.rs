//! Integration tests for the signal evaluator on crafted snapshots.
//!
//! Snapshots are built by hand so each rule's contribution is exact. The
//! candle history only supplies close prices and the series identity.

use candlesig_core::domain::{
    Candle, CandleSeries, Direction, Level, LevelKind, Levels, Signal, Timeframe, TrendBias,
};
use candlesig_core::indicators::{Column, EnrichedSeries, IndicatorSnapshot};
use candlesig_core::SignalEvaluator;
use chrono::{Duration, TimeZone, Utc};

// ── Helpers ──────────────────────────────────────────────────────────

/// 220 hourly candles rising 0.5 per candle from 100.
fn uptrend_series(n: usize) -> CandleSeries {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let candles = (0..n)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.5;
            Candle {
                timestamp: base + Duration::hours(i as i64),
                open: close - 0.25,
                high: close + 0.5,
                low: close - 0.75,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    CandleSeries::new("BTCUSDT", Timeframe::H1, candles).unwrap()
}

fn crafted(series: CandleSeries, cells: &[(Column, f64)], prev_hist: Option<f64>) -> EnrichedSeries {
    let last = series.len() - 1;
    let mut indicators = IndicatorSnapshot::empty(series.len());
    for &(column, value) in cells {
        indicators.set(column, last, Some(value));
    }
    indicators.set(Column::MacdHist, last - 1, prev_hist);
    EnrichedSeries { series, indicators }
}

fn bullish_setup() -> EnrichedSeries {
    let series = uptrend_series(220);
    let close = series.last().unwrap().close;
    crafted(
        series,
        &[
            (Column::EmaTrend, 1.0),
            (Column::Ema21, close - 2.0),
            (Column::Ema50, close - 5.0),
            (Column::Ema200, close - 30.0),
            (Column::Rsi14, 45.0),
            (Column::MacdHist, 0.4),
            (Column::VolRatio, 1.2),
            (Column::Atr14, 2.0),
        ],
        Some(-0.1),
    )
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn full_bullish_confluence_clamps_to_ninety() {
    let enriched = bullish_setup();
    let out = SignalEvaluator::default().evaluate(&enriched, &Levels::default(), TrendBias::Bullish);

    assert_eq!(out.len(), 1);
    let c = &out[0];
    assert_eq!(c.direction, Direction::Long);
    assert_eq!(c.confidence, 0.90);
    assert_eq!(
        c.reasons,
        vec![
            "ema_21 > ema_50",
            "rsi_pullback",
            "macd_bullish",
            "macd_cross_up",
            "volume_above_avg",
            "htf_trend_aligned",
        ]
    );
    assert_eq!(c.indicators.get("rsi_14"), Some(&45.0));
    assert!(!c.indicators.contains_key("bb_middle"));
}

#[test]
fn neutral_ema_trend_yields_nothing() {
    let series = uptrend_series(220);
    let enriched = crafted(
        series,
        &[
            (Column::EmaTrend, 0.0),
            (Column::Rsi14, 45.0),
            (Column::MacdHist, 0.4),
            (Column::VolRatio, 1.5),
            (Column::Atr14, 2.0),
        ],
        Some(-0.1),
    );
    for bias in [TrendBias::Bullish, TrendBias::Neutral, TrendBias::Bearish] {
        let out = SignalEvaluator::default().evaluate(&enriched, &Levels::default(), bias);
        assert!(out.is_empty(), "bias {bias:?} emitted");
    }
}

#[test]
fn close_below_ema200_blocks_long() {
    let series = uptrend_series(220);
    let close = series.last().unwrap().close;
    let enriched = crafted(
        series,
        &[
            (Column::EmaTrend, 1.0),
            (Column::Ema200, close + 1.0),
            (Column::MacdHist, 0.4),
            (Column::Atr14, 2.0),
        ],
        Some(-0.1),
    );
    let out = SignalEvaluator::default().evaluate(&enriched, &Levels::default(), TrendBias::Bullish);
    assert!(out.is_empty());
}

#[test]
fn conflicting_htf_can_suppress_a_setup() {
    let series = uptrend_series(220);
    let enriched = crafted(
        series,
        &[
            (Column::EmaTrend, 1.0),
            (Column::Rsi14, 45.0),
            (Column::Atr14, 2.0),
        ],
        None,
    );
    // 0.50 + 0.10 - 0.15 = 0.45
    let out = SignalEvaluator::default().evaluate(&enriched, &Levels::default(), TrendBias::Bearish);
    assert!(out.is_empty());
}

#[test]
fn long_exit_geometry_with_support() {
    let enriched = bullish_setup();
    let entry = enriched.series.last().unwrap().close;
    let levels = Levels {
        support: vec![Level {
            price: entry - 1.0,
            kind: LevelKind::Support,
            touches: 3,
            last_touch: 200,
        }],
        resistance: vec![],
    };
    let c = &SignalEvaluator::default().evaluate(&enriched, &levels, TrendBias::Bullish)[0];

    // support (entry - 1) is tighter than the ATR stop (entry - 3): stop = support - 0.5
    assert!((c.stop_loss - (entry - 1.5)).abs() < 1e-9);
    assert!(c.stop_loss < c.entry);
    assert!(c.entry < c.take_profit_1 && c.take_profit_1 < c.take_profit_2);
    assert!(c.take_profit_2 < c.take_profit_3);
    assert!((c.take_profit_1 - (entry + 2.25)).abs() < 1e-9);
    assert!(c.position_size_pct <= 20.0);
}

#[test]
fn short_exit_geometry_mirrors_long() {
    let series = uptrend_series(220);
    let close = series.last().unwrap().close;
    let enriched = crafted(
        series,
        &[
            (Column::EmaTrend, -1.0),
            (Column::Rsi14, 60.0),
            (Column::MacdHist, -0.2),
            (Column::Atr14, 2.0),
        ],
        Some(0.1),
    );
    let out = SignalEvaluator::default().evaluate(&enriched, &Levels::default(), TrendBias::Bearish);
    let c = &out[0];

    assert_eq!(c.direction, Direction::Short);
    assert_eq!(c.confidence, 0.90);
    assert_eq!(
        c.reasons,
        vec!["ema_21 < ema_50", "rsi_bounce", "macd_bearish", "macd_cross_down", "htf_trend_aligned"]
    );
    assert!((c.stop_loss - (close + 3.0)).abs() < 1e-9);
    assert!(c.take_profit_1 > c.take_profit_2 && c.take_profit_2 > c.take_profit_3);
}

#[test]
fn persisted_record_carries_snapshot() {
    let enriched = bullish_setup();
    let candidate = SignalEvaluator::default()
        .evaluate(&enriched, &Levels::default(), TrendBias::Bullish)
        .remove(0);
    let created = Utc.with_ymd_and_hms(2024, 6, 10, 4, 0, 0).unwrap();
    let signal = Signal::from_candidate(candidate, &Levels::default(), None, created);

    assert_eq!(signal.expires_at - signal.created_at, Duration::hours(12));
    assert_eq!(signal.indicators["reasons"][0], "ema_21 > ema_50");
    assert_eq!(signal.indicators["macd_hist"], 0.4);
    assert!(signal.indicators["levels"]["support"].as_array().unwrap().is_empty());
}
