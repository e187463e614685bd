//! candlesig runner: orchestration around the pure compute phase.
//!
//! Features:
//! - TOML engine configuration with validated defaults
//! - Candle sources (in-memory, CSV directory tree)
//! - Signal stores (in-memory, append-only JSONL) with write-time cooldown
//! - Per-pair orchestrator: cooldown, load, compute, confluence, persist
//! - Parallel batch scan over symbols × timeframes (rayon)
//! - Seeded synthetic candles for demos and benchmarks

pub mod config;
pub mod csv_source;
pub mod jsonl_store;
pub mod orchestrator;
pub mod scan;
pub mod source;
pub mod store;
pub mod synthetic;

pub use config::{ConfigError, EngineConfig, EngineSection};
pub use csv_source::CsvSource;
pub use jsonl_store::JsonlStore;
pub use orchestrator::{Orchestrator, Outcome, RunError};
pub use scan::{scan, PairFailure, PairSkip, ScanReport};
pub use source::{CandleSource, MemorySource, SeriesRequest, SourceError};
pub use store::{MemoryStore, SignalStore, StoreError};
pub use synthetic::{pair_seed, random_walk, SyntheticParams};
