//! The full indicator snapshot for one candle series.
//!
//! Nineteen index-aligned columns. Single-line indicators run through
//! [`Indicator`]; MACD, Stochastic RSI and Bollinger compute all their lines
//! once. Derived columns (`ema_trend`, `vol_ratio`) are built from the
//! computed ones.

use std::collections::BTreeMap;
use std::fmt;

use super::{
    bollinger_bands, closes, macd_lines, stoch_rsi_lines, Atr, Ema, Indicator, Obv, Rsi, Series,
    Sma, SmaSource, Vwap,
};
use crate::domain::{Candle, CandleSeries};
use crate::numeric::round_price;

/// Snapshot column identifiers, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Ema9,
    Ema21,
    Ema50,
    Ema200,
    Macd,
    MacdSignal,
    MacdHist,
    Rsi14,
    StochRsiK,
    StochRsiD,
    BbUpper,
    BbMiddle,
    BbLower,
    Atr14,
    Obv,
    VolSma20,
    Vwap,
    EmaTrend,
    VolRatio,
}

impl Column {
    pub const COUNT: usize = 19;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Ema9,
        Column::Ema21,
        Column::Ema50,
        Column::Ema200,
        Column::Macd,
        Column::MacdSignal,
        Column::MacdHist,
        Column::Rsi14,
        Column::StochRsiK,
        Column::StochRsiD,
        Column::BbUpper,
        Column::BbMiddle,
        Column::BbLower,
        Column::Atr14,
        Column::Obv,
        Column::VolSma20,
        Column::Vwap,
        Column::EmaTrend,
        Column::VolRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Ema9 => "ema_9",
            Column::Ema21 => "ema_21",
            Column::Ema50 => "ema_50",
            Column::Ema200 => "ema_200",
            Column::Macd => "macd",
            Column::MacdSignal => "macd_signal",
            Column::MacdHist => "macd_hist",
            Column::Rsi14 => "rsi_14",
            Column::StochRsiK => "stochrsi_k",
            Column::StochRsiD => "stochrsi_d",
            Column::BbUpper => "bb_upper",
            Column::BbMiddle => "bb_middle",
            Column::BbLower => "bb_lower",
            Column::Atr14 => "atr_14",
            Column::Obv => "obv",
            Column::VolSma20 => "vol_sma_20",
            Column::Vwap => "vwap",
            Column::EmaTrend => "ema_trend",
            Column::VolRatio => "vol_ratio",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index-aligned indicator columns for one candle series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    len: usize,
    columns: Vec<Series>,
}

impl IndicatorSnapshot {
    /// A snapshot of `len` rows with every value undefined.
    pub fn empty(len: usize) -> Self {
        Self {
            len,
            columns: vec![vec![None; len]; Column::COUNT],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn series(&self, column: Column) -> &[Option<f64>] {
        &self.columns[column.index()]
    }

    pub fn get(&self, column: Column, index: usize) -> Option<f64> {
        self.columns[column.index()].get(index).copied().flatten()
    }

    /// Overwrite one cell. Out-of-range indices are ignored.
    pub fn set(&mut self, column: Column, index: usize, value: Option<f64>) {
        if let Some(cell) = self.columns[column.index()].get_mut(index) {
            *cell = value;
        }
    }

    fn set_series(&mut self, column: Column, series: Series) {
        debug_assert_eq!(series.len(), self.len);
        self.columns[column.index()] = series;
    }

    pub fn row(&self, index: usize) -> IndicatorRow {
        let mut values = [None; Column::COUNT];
        for column in Column::ALL {
            values[column.index()] = self.get(column, index);
        }
        IndicatorRow { index, values }
    }

    pub fn last_row(&self) -> Option<IndicatorRow> {
        self.len.checked_sub(1).map(|i| self.row(i))
    }
}

/// All snapshot values for a single candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub index: usize,
    values: [Option<f64>; Column::COUNT],
}

impl IndicatorRow {
    pub fn get(&self, column: Column) -> Option<f64> {
        self.values[column.index()]
    }

    /// Defined values keyed by column name, rounded to price precision.
    pub fn to_summary(&self) -> BTreeMap<String, f64> {
        Column::ALL
            .iter()
            .filter_map(|&c| self.get(c).map(|v| (c.name().to_string(), round_price(v))))
            .collect()
    }
}

/// A candle series paired with its indicator snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    pub series: CandleSeries,
    pub indicators: IndicatorSnapshot,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Compute every snapshot column for `candles`. The input is only read.
pub fn compute_indicators(candles: &[Candle]) -> IndicatorSnapshot {
    let n = candles.len();
    let mut snapshot = IndicatorSnapshot::empty(n);

    let single: [(Column, Box<dyn Indicator>); 9] = [
        (Column::Ema9, Box::new(Ema::new(9))),
        (Column::Ema21, Box::new(Ema::new(21))),
        (Column::Ema50, Box::new(Ema::new(50))),
        (Column::Ema200, Box::new(Ema::new(200))),
        (Column::Rsi14, Box::new(Rsi::new(14))),
        (Column::Atr14, Box::new(Atr::new(14))),
        (Column::Obv, Box::new(Obv::new())),
        (Column::VolSma20, Box::new(Sma::over(20, SmaSource::Volume))),
        (Column::Vwap, Box::new(Vwap::new())),
    ];
    for (column, indicator) in &single {
        snapshot.set_series(*column, indicator.compute(candles));
    }

    let close = closes(candles);
    let (line, signal, hist) = macd_lines(&close, 12, 26, 9);
    snapshot.set_series(Column::Macd, line);
    snapshot.set_series(Column::MacdSignal, signal);
    snapshot.set_series(Column::MacdHist, hist);

    let (k, d) = stoch_rsi_lines(&close, 14, 14, 3, 3);
    snapshot.set_series(Column::StochRsiK, k);
    snapshot.set_series(Column::StochRsiD, d);

    let (upper, middle, lower) = bollinger_bands(candles, 20, 2.0);
    snapshot.set_series(Column::BbUpper, upper);
    snapshot.set_series(Column::BbMiddle, middle);
    snapshot.set_series(Column::BbLower, lower);

    let ema_trend: Series = snapshot
        .series(Column::Ema21)
        .iter()
        .zip(snapshot.series(Column::Ema50))
        .map(|(fast, slow)| {
            let diff = (*fast)? - (*slow)?;
            Some(if diff > 0.0 {
                1.0
            } else if diff < 0.0 {
                -1.0
            } else {
                0.0
            })
        })
        .collect();
    snapshot.set_series(Column::EmaTrend, ema_trend);

    let vol_ratio: Series = candles
        .iter()
        .zip(snapshot.series(Column::VolSma20))
        .map(|(c, avg)| match avg {
            Some(avg) if *avg > 0.0 => Some(c.volume / avg),
            _ => None,
        })
        .collect();
    snapshot.set_series(Column::VolRatio, vol_ratio);

    snapshot
}

/// Pair a series with its freshly computed snapshot.
pub fn enrich(series: &CandleSeries) -> EnrichedSeries {
    EnrichedSeries {
        indicators: compute_indicators(series.candles()),
        series: series.clone(),
    }
}
