//! Moving average crossover — golden cross and death cross detection.
//!
//! Buys when the fast SMA crosses above the slow SMA (golden cross).
//! Sells when the fast SMA crosses below the slow SMA (death cross).

use crate::domain::{Bar, Signal};
use crate::indicators::sma_ending_at;
use crate::strategy::{Strategy, StrategyFault};

use super::ParamError;

/// SMA crossover on closes.
///
/// Holds until `slow` bars of history exist before `index`, so both averages
/// are defined on the current and the previous bar.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast: usize,
    slow: usize,
    name: String,
}

impl MaCrossover {
    pub fn new(fast: usize, slow: usize) -> Result<Self, ParamError> {
        if fast == 0 || slow <= fast {
            return Err(ParamError::InvalidPeriods { fast, slow });
        }
        Ok(Self {
            fast,
            slow,
            name: format!("ma_crossover_{fast}_{slow}"),
        })
    }

    pub fn fast(&self) -> usize {
        self.fast
    }

    pub fn slow(&self) -> usize {
        self.slow
    }

    pub fn warmup_bars(&self) -> usize {
        self.slow
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, history: &[Bar], index: usize) -> Result<Signal, StrategyFault> {
        if index < self.warmup_bars() || index >= history.len() {
            return Ok(Signal::Hold);
        }

        let values = (
            sma_ending_at(history, index, self.fast),
            sma_ending_at(history, index, self.slow),
            sma_ending_at(history, index - 1, self.fast),
            sma_ending_at(history, index - 1, self.slow),
        );
        let (Some(fast_cur), Some(slow_cur), Some(fast_prev), Some(slow_prev)) = values else {
            return Ok(Signal::Hold);
        };

        if fast_cur > slow_cur && fast_prev <= slow_prev {
            return Ok(Signal::Buy);
        }
        if fast_cur < slow_cur && fast_prev >= slow_prev {
            return Ok(Signal::Sell);
        }
        Ok(Signal::Hold)
    }
}
