//! Domain types for candlesig

pub mod candle;
pub mod ids;
pub mod level;
pub mod signal;
pub mod timeframe;

pub use candle::{Candle, CandleSeries, MalformedCandle, RejectedCandle, SeriesError};
pub use ids::{DatasetHash, SignalId};
pub use level::{Level, LevelKind, Levels};
pub use signal::{
    Direction, Signal, SignalCandidate, SignalStatus, TrendBias, SIGNAL_SOURCE,
};
pub use timeframe::{Timeframe, TimeframeParseError};
