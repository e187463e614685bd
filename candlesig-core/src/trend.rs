//! Higher-timeframe trend classification.

use crate::domain::{Candle, CandleSeries, Timeframe, TrendBias};
use crate::indicators::{Ema, Indicator};

/// Candles required before a higher-timeframe series is classified.
pub const MIN_HTF_CANDLES: usize = 210;

/// Classify the trend at the latest candle.
///
/// Bullish iff EMA21 > EMA50 and close > EMA200; bearish iff EMA21 < EMA50
/// and close < EMA200; neutral otherwise, including when history is short
/// or any of the three averages is undefined.
pub fn classify_trend(candles: &[Candle]) -> TrendBias {
    if candles.len() < MIN_HTF_CANDLES {
        return TrendBias::Neutral;
    }
    let Some(last) = candles.last() else {
        return TrendBias::Neutral;
    };

    let latest = |period: usize| Ema::new(period).compute(candles).last().copied().flatten();
    let (Some(fast), Some(slow), Some(long)) = (latest(21), latest(50), latest(200)) else {
        return TrendBias::Neutral;
    };

    if fast > slow && last.close > long {
        TrendBias::Bullish
    } else if fast < slow && last.close < long {
        TrendBias::Bearish
    } else {
        TrendBias::Neutral
    }
}

/// Bias for an entry on `timeframe`, given the series loaded for its higher
/// timeframe. Timeframes without a higher mapping are always neutral.
pub fn htf_bias(timeframe: Timeframe, higher: Option<&CandleSeries>) -> TrendBias {
    if timeframe.higher().is_none() {
        return TrendBias::Neutral;
    }
    higher.map_or(TrendBias::Neutral, |series| classify_trend(series.candles()))
}
