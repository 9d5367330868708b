//! Built-in strategies.
//!
//! Each one is a pure decision rule over the bar history. They carry
//! parameters only, never per-run state, so one instance can be shared
//! across concurrent runs.

pub mod buy_and_hold;
pub mod ma_crossover;
pub mod momentum;
pub mod scripted;
pub mod signal_series;

pub use buy_and_hold::BuyAndHold;
pub use ma_crossover::MaCrossover;
pub use momentum::Momentum;
pub use scripted::Scripted;
pub use signal_series::SignalSeries;

use thiserror::Error;

/// Invalid strategy parameters, rejected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("moving average periods must satisfy 1 <= fast < slow (got fast={fast}, slow={slow})")]
    InvalidPeriods { fast: usize, slow: usize },

    #[error("lookback must be >= 1")]
    ZeroLookback,

    #[error("threshold must be finite and >= 0 (got {0})")]
    InvalidThreshold(f64),
}
