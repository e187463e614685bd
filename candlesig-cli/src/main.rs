//! candlesig CLI: signal analysis, scans and signal history.
//!
//! Commands:
//! - `analyze`: evaluate one symbol/timeframe and persist any signal
//! - `scan`: evaluate every symbol in the data directory across entry timeframes
//! - `signals`: list recent signals from the store
//! - `demo`: scan seeded synthetic markets in memory

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::Level;

use candlesig_core::domain::{Signal, Timeframe};
use candlesig_runner::{
    pair_seed, random_walk, scan, CsvSource, EngineConfig, JsonlStore, MemorySource, MemoryStore,
    Orchestrator, Outcome, ScanReport, SignalStore, SyntheticParams,
};

#[derive(Parser)]
#[command(
    name = "candlesig",
    about = "candlesig: technical signal generation engine"
)]
struct Cli {
    /// Engine config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single symbol/timeframe and persist any signal.
    Analyze {
        /// Symbol to analyze (e.g. BTCUSDT).
        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        /// Timeframe: 5m, 15m, 1h, 4h, 1d.
        #[arg(long, default_value = "1h")]
        timeframe: Timeframe,

        /// Candle directory laid out as <dir>/<SYMBOL>/<tf>.csv.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// JSONL signal store.
        #[arg(long, default_value = "signals.jsonl")]
        store: PathBuf,
    },
    /// Scan symbols for signals across timeframes.
    Scan {
        /// Only scan the first N symbols (sorted).
        #[arg(long, default_value_t = 50)]
        top: usize,

        /// Single timeframe. Omit to scan the configured entry timeframes.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, default_value = "signals.jsonl")]
        store: PathBuf,
    },
    /// Show recent signals from the store.
    Signals {
        /// Filter by symbol.
        #[arg(long)]
        symbol: Option<String>,

        /// Number of recent signals to show.
        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, default_value = "signals.jsonl")]
        store: PathBuf,
    },
    /// Scan synthetic random-walk markets (nothing touches disk unless --write-data is given).
    Demo {
        /// Symbols to synthesize.
        #[arg(long, num_args = 1.., default_values_t = ["BTCUSDT".to_string(), "ETHUSDT".to_string(), "SOLUSDT".to_string()])]
        symbols: Vec<String>,

        /// Candles generated per timeframe.
        #[arg(long, default_value_t = 300)]
        candles: usize,

        /// Mean per-candle return.
        #[arg(long, default_value_t = 0.001)]
        drift: f64,

        /// Base seed, mixed with each (symbol, timeframe).
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Also write the generated candles as CSV under this directory.
        #[arg(long)]
        write_data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframe,
            data_dir,
            store,
        } => run_analyze(&config, &symbol, timeframe, data_dir, store),
        Commands::Scan {
            top,
            timeframe,
            data_dir,
            store,
        } => run_scan(&config, top, timeframe, data_dir, store),
        Commands::Signals {
            symbol,
            limit,
            store,
        } => run_signals(&config, symbol.as_deref(), limit, store),
        Commands::Demo {
            symbols,
            candles,
            drift,
            seed,
            write_data,
        } => run_demo(&config, &symbols, candles, drift, seed, write_data),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn open_store(config: &EngineConfig, path: PathBuf) -> JsonlStore {
    JsonlStore::with_cooldown(path, config.cooldown())
}

fn run_analyze(
    config: &EngineConfig,
    symbol: &str,
    timeframe: Timeframe,
    data_dir: PathBuf,
    store: PathBuf,
) -> Result<()> {
    let source = CsvSource::new(data_dir);
    let store = open_store(config, store);
    let orch = Orchestrator::new(&source, &store, config.clone());

    tracing::info!(symbol, timeframe = %timeframe, "analyze_starting");
    match orch.evaluate_pair(symbol, timeframe, Utc::now())? {
        Outcome::Emitted(signals) => {
            for s in &signals {
                println!("{}", signal_line(s));
            }
        }
        Outcome::CooldownActive { age } => {
            println!(
                "No signal for {symbol}/{timeframe}: cooldown active ({}m since last signal)",
                age.num_minutes()
            );
        }
        Outcome::InsufficientData {
            available,
            required,
        } => {
            println!("No signal for {symbol}/{timeframe}: {available} candles, {required} required");
        }
        Outcome::NoSignal => println!("No signal for {symbol}/{timeframe}"),
    }
    Ok(())
}

fn run_scan(
    config: &EngineConfig,
    top: usize,
    timeframe: Option<Timeframe>,
    data_dir: PathBuf,
    store: PathBuf,
) -> Result<()> {
    let source = CsvSource::new(data_dir);
    let mut symbols = source
        .symbols()
        .with_context(|| format!("listing symbols under {}", source.root().display()))?;
    if symbols.is_empty() {
        bail!(
            "no symbol directories under {}; expected <dir>/<SYMBOL>/<tf>.csv",
            source.root().display()
        );
    }
    symbols.truncate(top);

    let timeframes = match timeframe {
        Some(tf) => vec![tf],
        None => config.engine.entry_timeframes.clone(),
    };

    let store = open_store(config, store);
    let orch = Orchestrator::new(&source, &store, config.clone());
    tracing::info!(symbols = symbols.len(), timeframes = ?timeframes, "scan_starting");
    let report = scan(&orch, &symbols, &timeframes, Utc::now());
    print_report(&report);
    Ok(())
}

fn run_signals(config: &EngineConfig, symbol: Option<&str>, limit: usize, store: PathBuf) -> Result<()> {
    let store = open_store(config, store);
    let rows = store.recent_signals(symbol, limit)?;
    if rows.is_empty() {
        println!("No signals found.");
        return Ok(());
    }

    println!(
        "{:>5} {:<12} {:<6} {:<5} {:>5}  {:>14}  {:<10} {:<20}",
        "ID", "Symbol", "Dir", "TF", "Conf", "Entry", "Status", "Created"
    );
    println!("{}", "-".repeat(87));
    for s in rows {
        let id = s.id.map(|id| id.to_string()).unwrap_or_default();
        let status = serde_json::to_value(s.status)?;
        println!(
            "{:>5} {:<12} {:<6} {:<5} {:>4.0}%  {:>14}  {:<10} {:<20}",
            id,
            s.symbol,
            s.direction.as_str().to_uppercase(),
            s.timeframe,
            s.confidence * 100.0,
            s.entry,
            status.as_str().unwrap_or_default(),
            s.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}

fn run_demo(
    config: &EngineConfig,
    symbols: &[String],
    candles: usize,
    drift: f64,
    seed: u64,
    write_data: Option<PathBuf>,
) -> Result<()> {
    let now = Utc::now();
    let source = MemorySource::new();
    let csv = write_data.map(CsvSource::new);
    let params = SyntheticParams {
        drift,
        ..SyntheticParams::default()
    };

    for symbol in symbols {
        for tf in demo_timeframes(config) {
            let end = align_to(now, tf);
            let series = random_walk(symbol, tf, candles, end, &params, seed ^ pair_seed(symbol, tf))?;
            if let Some(csv) = &csv {
                let path = csv.write_series(&series)?;
                tracing::debug!(path = %path.display(), "demo_series_written");
            }
            source.insert(symbol.as_str(), tf, series.candles().to_vec());
        }
    }

    let store = MemoryStore::new(config.cooldown());
    let orch = Orchestrator::new(&source, &store, config.clone());
    let report = scan(&orch, symbols, &config.engine.entry_timeframes, now);
    print_report(&report);
    Ok(())
}

/// Entry timeframes plus every timeframe they consult.
fn demo_timeframes(config: &EngineConfig) -> Vec<Timeframe> {
    let mut tfs: Vec<Timeframe> = config
        .engine
        .entry_timeframes
        .iter()
        .flat_map(|tf| {
            std::iter::once(*tf)
                .chain(tf.higher())
                .chain(tf.confluence().iter().copied())
        })
        .collect();
    tfs.sort();
    tfs.dedup();
    tfs
}

/// Open time of the candle containing `t`.
fn align_to(t: DateTime<Utc>, timeframe: Timeframe) -> DateTime<Utc> {
    let step = timeframe.duration().num_seconds();
    let secs = t.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(step), 0).unwrap_or(t)
}

fn signal_line(s: &Signal) -> String {
    format!(
        "SIGNAL: {} {} @ {} | SL={} TP1={} | confidence={:.0}% R:R={}",
        s.direction.as_str().to_uppercase(),
        s.symbol,
        s.entry,
        s.stop_loss,
        s.take_profit_1,
        s.confidence * 100.0,
        s.risk_reward
    )
}

fn print_report(report: &ScanReport) {
    println!(
        "\n{:<12} {:<6} {:<5} {:>5}  {:>14}  {:>14}  {:>14}",
        "Symbol", "Dir", "TF", "Conf", "Entry", "SL", "TP1"
    );
    println!("{}", "-".repeat(80));
    for s in &report.emitted {
        println!(
            "{:<12} {:<6} {:<5} {:>4.0}%  {:>14}  {:>14}  {:>14}",
            s.symbol,
            s.direction.as_str().to_uppercase(),
            s.timeframe,
            s.confidence * 100.0,
            s.entry,
            s.stop_loss,
            s.take_profit_1
        );
    }
    for f in &report.failures {
        println!("FAILED: {}/{}: {}", f.symbol, f.timeframe, f.error);
    }
    println!(
        "\nTotal signals: {} ({} pairs, {} skipped, {} failed)",
        report.emitted.len(),
        report.pairs(),
        report.skipped.len(),
        report.failures.len()
    );
}
