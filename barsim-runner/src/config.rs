//! Serializable backtest configuration (TOML).
//!
//! ```toml
//! [backtest]
//! data = "spy.csv"
//! symbol = "SPY"
//! initial_capital = 10000.0
//!
//! [strategy]
//! type = "ma_crossover"
//! fast = 10
//! slow = 50
//! ```

use std::path::{Path, PathBuf};

use barsim_core::domain::Signal;
use barsim_core::strategies::{BuyAndHold, MaCrossover, Momentum, ParamError, SignalSeries};
use barsim_core::Strategy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default starting capital when the config omits it.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("initial_capital must be finite and > 0 (got {0})")]
    InvalidCapital(f64),

    #[error("no data source: set backtest.data or backtest.synthetic_bars")]
    MissingDataSource,

    #[error("start_date {start} is after end_date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid strategy parameters: {0}")]
    Strategy(#[from] ParamError),

    #[error("strategy 'signal_column' needs a 'signal' column in the data")]
    MissingSignalColumn,
}

/// Top-level config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategyConfig,
}

/// `[backtest]` section: data source and capital.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSection {
    /// CSV price file. Relative paths resolve against the config file's directory.
    #[serde(default)]
    pub data: Option<PathBuf>,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    /// Inclusive date filters applied after loading.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// When > 0, generate this many synthetic bars instead of reading `data`.
    #[serde(default)]
    pub synthetic_bars: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_symbol() -> String {
    "UNKNOWN".into()
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

fn default_seed() -> u64 {
    42
}

/// `[strategy]` section (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Buy on the first bar and hold.
    BuyAndHold,

    /// SMA crossover: fast crosses slow.
    MaCrossover { fast: usize, slow: usize },

    /// Rate-of-change momentum.
    Momentum {
        lookback: usize,
        #[serde(default)]
        threshold: f64,
    },

    /// Replay the `signal` column of the price file.
    SignalColumn,
}

impl StrategyConfig {
    /// Short label used in reports (e.g., "ma_crossover_10_50").
    pub fn label(&self) -> String {
        match self {
            Self::BuyAndHold => "buy_and_hold".into(),
            Self::MaCrossover { fast, slow } => format!("ma_crossover_{fast}_{slow}"),
            Self::Momentum { lookback, .. } => format!("momentum_{lookback}"),
            Self::SignalColumn => "signal_column".into(),
        }
    }

    /// Check parameters without building.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::MaCrossover { fast, slow } => {
                MaCrossover::new(*fast, *slow)?;
            }
            Self::Momentum {
                lookback,
                threshold,
            } => {
                Momentum::new(*lookback, *threshold)?;
            }
            Self::BuyAndHold | Self::SignalColumn => {}
        }
        Ok(())
    }

    /// Build the strategy. `signal_column` is the loaded `signal` column, if any.
    pub fn build(&self, signal_column: Option<&[Signal]>) -> Result<Box<dyn Strategy>, ConfigError> {
        let strategy: Box<dyn Strategy> = match self {
            Self::BuyAndHold => Box::new(BuyAndHold),
            Self::MaCrossover { fast, slow } => Box::new(MaCrossover::new(*fast, *slow)?),
            Self::Momentum {
                lookback,
                threshold,
            } => Box::new(Momentum::new(*lookback, *threshold)?),
            Self::SignalColumn => {
                let signals = signal_column.ok_or(ConfigError::MissingSignalColumn)?;
                Box::new(SignalSeries::named("signal_column", signals.to_vec()))
            }
        };
        Ok(strategy)
    }
}

impl BacktestConfig {
    /// Read and validate a config file. A relative `data` path is resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(data), Some(dir)) = (config.backtest.data.as_mut(), path.parent()) {
            if data.is_relative() {
                *data = dir.join(&*data);
            }
        }
        Ok(config)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        if !b.initial_capital.is_finite() || b.initial_capital <= 0.0 {
            return Err(ConfigError::InvalidCapital(b.initial_capital));
        }
        if b.data.is_none() && b.synthetic_bars == 0 {
            return Err(ConfigError::MissingDataSource);
        }
        if let (Some(start), Some(end)) = (b.start_date, b.end_date) {
            if start > end {
                return Err(ConfigError::InvalidDateRange { start, end });
            }
        }
        self.strategy.validate()
    }

    /// Deterministic BLAKE3 hash of this configuration.
    ///
    /// Two runs with identical configs share the same hash.
    pub fn config_hash(&self) -> String {
        // Serializing plain data to JSON cannot fail; fall back to Debug anyway.
        let canonical = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}
