//! barsim runner — backtest orchestration, metrics, batch ranking, export.
//!
//! This crate builds on `barsim-core` to provide:
//! - TOML run configs
//! - CSV and synthetic data loading with dataset hashing
//! - Single-backtest runner with performance metrics
//! - Parallel batch runs ranked by a fitness metric
//! - JSON/CSV artifact export

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod fitness;
pub mod metrics;
pub mod runner;

pub use batch::{ma_crossover_grid, presets, BatchResults, BatchRunner, SkippedRun};
pub use config::{BacktestConfig, BacktestSection, ConfigError, StrategyConfig};
pub use data_loader::{load_bars, load_csv, synthetic, DataSource, LoadError, LoadedData};
pub use fitness::FitnessMetric;
pub use metrics::PerformanceMetrics;
pub use runner::{
    run_backtest_from_data, run_single_backtest, BacktestResult, RunContext, RunError,
    SCHEMA_VERSION,
};
