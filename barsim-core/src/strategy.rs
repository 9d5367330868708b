//! Strategy capability — one decision per bar.
//!
//! A strategy sees only the bars up to and including the current one. The
//! simulator hands it `&bars[..=index]`, so later bars are out of reach.

use thiserror::Error;

use crate::domain::{Bar, Signal};

/// Failure raised by a strategy while deciding. Propagated to the caller
/// unchanged; the simulator never substitutes a default signal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyFault {
    #[error("unrecognized signal '{0}'")]
    UnknownSignal(String),

    #[error("no signal for bar {index} (only {available} available)")]
    MissingSignal { index: usize, available: usize },

    #[error("strategy failed: {0}")]
    Failed(String),
}

/// A per-bar decision function.
///
/// # Contract
/// `history` is the bar sequence up to and including `index`
/// (`history.len() == index + 1`). Implementations must be deterministic for
/// the same inputs; they hold no per-run mutable state.
pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "ma_crossover").
    fn name(&self) -> &str {
        "custom"
    }

    /// Decide what to do at `index`.
    fn decide(&self, history: &[Bar], index: usize) -> Result<Signal, StrategyFault>;
}

/// Any plain decision closure is a strategy.
impl<F> Strategy for F
where
    F: Fn(&[Bar], usize) -> Signal + Send + Sync,
{
    fn decide(&self, history: &[Bar], index: usize) -> Result<Signal, StrategyFault> {
        Ok(self(history, index))
    }
}
