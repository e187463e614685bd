//! Support / resistance detection from swing points.
//!
//! A swing high at index i is a high that is the strict maximum of the
//! window [i - w, i + w]; swing lows mirror it. Candles closer than `w` to
//! either end of the series are never swing points. Swing prices are then
//! clustered by a single greedy pass over the sorted prices.

use serde::{Deserialize, Serialize};

use crate::domain::{Candle, Level, LevelKind, Levels};
use crate::numeric::round_price;

/// Detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    /// Half-width of the swing window.
    pub window: usize,
    /// Maximum distance to the cluster mean, in percent of the mean.
    pub tolerance_pct: f64,
    /// Levels kept per kind.
    pub max_levels: usize,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            window: 5,
            tolerance_pct: 0.5,
            max_levels: 10,
        }
    }
}

/// A swing point: candle index and price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
}

pub fn swing_highs(candles: &[Candle], window: usize) -> Vec<SwingPoint> {
    swing_points(candles, window, |c| c.high, |a, b| a > b)
}

pub fn swing_lows(candles: &[Candle], window: usize) -> Vec<SwingPoint> {
    swing_points(candles, window, |c| c.low, |a, b| a < b)
}

fn swing_points(
    candles: &[Candle],
    window: usize,
    value: impl Fn(&Candle) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Vec<SwingPoint> {
    let n = candles.len();
    if window == 0 || n < 2 * window + 1 {
        return Vec::new();
    }

    (window..n - window)
        .filter_map(|i| {
            let price = value(&candles[i]);
            let strict = (i - window..=i + window)
                .filter(|&j| j != i)
                .all(|j| beats(price, value(&candles[j])));
            strict.then_some(SwingPoint { index: i, price })
        })
        .collect()
}

/// Merge swing points into levels of `kind`, ranked and truncated.
///
/// Ranking: touches descending, then most recent touch first, then price
/// ascending so the order is total.
pub fn cluster(points: &[SwingPoint], kind: LevelKind, params: &LevelParams) -> Vec<Level> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price).then(a.index.cmp(&b.index)));

    let tolerance = params.tolerance_pct / 100.0;
    let mut clusters: Vec<Vec<SwingPoint>> = Vec::new();
    let mut current: Vec<SwingPoint> = Vec::new();
    for point in sorted {
        if let Some(center) = mean_price(&current) {
            if (point.price - center).abs() / center > tolerance {
                clusters.push(std::mem::take(&mut current));
            }
        }
        current.push(point);
    }
    clusters.push(current);

    let mut levels: Vec<Level> = clusters
        .into_iter()
        .filter_map(|members| {
            let price = mean_price(&members)?;
            Some(Level {
                price: round_price(price),
                kind,
                touches: members.len(),
                last_touch: members.iter().map(|p| p.index).max()?,
            })
        })
        .collect();

    levels.sort_by(|a, b| {
        b.touches
            .cmp(&a.touches)
            .then(b.last_touch.cmp(&a.last_touch))
            .then(a.price.total_cmp(&b.price))
    });
    levels.truncate(params.max_levels);
    levels
}

fn mean_price(points: &[SwingPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().map(|p| p.price).sum::<f64>() / points.len() as f64)
}

/// Support and resistance levels for a candle history.
pub fn detect_levels(candles: &[Candle], params: &LevelParams) -> Levels {
    Levels {
        support: cluster(&swing_lows(candles, params.window), LevelKind::Support, params),
        resistance: cluster(
            &swing_highs(candles, params.window),
            LevelKind::Resistance,
            params,
        ),
    }
}
