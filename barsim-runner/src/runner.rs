//! Backtest runner — wires together data loading, the simulator, and metrics.
//!
//! Two entry points:
//! - `run_single_backtest()`: loads data per the config, then runs. Used by the CLI.
//! - `run_backtest_from_data()`: takes pre-loaded bars and a built strategy.
//!   Used by batch runs to avoid re-reading the CSV for every strategy.

use barsim_core::domain::{equity_curve, pair_round_trips, Bar, EquityRecord, RoundTrip, Trade};
use barsim_core::{SimulationError, Simulator, Strategy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_bars, LoadError};
use crate::metrics::PerformanceMetrics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub strategy: String,
    /// Empty when the run was not driven by a config file.
    #[serde(default)]
    pub config_hash: String,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    pub initial_capital: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub metrics: PerformanceMetrics,
    pub records: Vec<EquityRecord>,
    pub trades: Vec<Trade>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestResult {
    pub fn equity_curve(&self) -> Vec<f64> {
        equity_curve(&self.records)
    }

    pub fn round_trips(&self) -> Vec<RoundTrip> {
        pair_round_trips(&self.trades)
    }
}

/// Provenance attached to a run over pre-loaded bars.
#[derive(Debug, Clone, Default)]
pub struct RunContext<'a> {
    pub symbol: &'a str,
    pub config_hash: &'a str,
    pub dataset_hash: &'a str,
    pub has_synthetic: bool,
}

/// Run a single backtest from a `BacktestConfig` (loads data first).
pub fn run_single_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let loaded = load_bars(&config.backtest)?;
    let strategy = config.strategy.build(loaded.signals.as_deref())?;
    let config_hash = config.config_hash();

    run_backtest_from_data(
        &loaded.bars,
        strategy.as_ref(),
        config.backtest.initial_capital,
        &RunContext {
            symbol: &loaded.symbol,
            config_hash: &config_hash,
            dataset_hash: &loaded.dataset_hash,
            has_synthetic: loaded.has_synthetic,
        },
    )
}

/// Run a backtest over pre-loaded bars without any I/O.
///
/// A fresh `Simulator` is built per call.
pub fn run_backtest_from_data<S>(
    bars: &[Bar],
    strategy: &S,
    initial_capital: f64,
    ctx: &RunContext<'_>,
) -> Result<BacktestResult, RunError>
where
    S: Strategy + ?Sized,
{
    let output = Simulator::new(initial_capital)?.run(bars, strategy)?;
    let metrics = PerformanceMetrics::compute(&output.records, &output.trades, initial_capital);

    // `run` rejects empty series, so both ends exist.
    let (start_date, end_date) = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(SimulationError::EmptySeries.into()),
    };

    info!(
        symbol = ctx.symbol,
        strategy = strategy.name(),
        total_return = metrics.total_return,
        sharpe = metrics.sharpe_ratio,
        round_trips = metrics.num_trades,
        "backtest complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        symbol: ctx.symbol.to_string(),
        strategy: strategy.name().to_string(),
        config_hash: ctx.config_hash.to_string(),
        dataset_hash: ctx.dataset_hash.to_string(),
        has_synthetic: ctx.has_synthetic,
        initial_capital,
        start_date,
        end_date,
        bar_count: bars.len(),
        metrics,
        records: output.records,
        trades: output.trades,
    })
}
