//! Rate-of-change momentum.
//!
//! Buys when the close has risen more than `threshold` over `lookback` bars,
//! sells when it has fallen more than `threshold`.

use crate::domain::{Bar, Signal};
use crate::indicators::roc_at;
use crate::strategy::{Strategy, StrategyFault};

use super::ParamError;

#[derive(Debug, Clone)]
pub struct Momentum {
    lookback: usize,
    threshold: f64,
    name: String,
}

impl Momentum {
    pub fn new(lookback: usize, threshold: f64) -> Result<Self, ParamError> {
        if lookback == 0 {
            return Err(ParamError::ZeroLookback);
        }
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ParamError::InvalidThreshold(threshold));
        }
        Ok(Self {
            lookback,
            threshold,
            name: format!("momentum_{lookback}"),
        })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, history: &[Bar], index: usize) -> Result<Signal, StrategyFault> {
        let Some(roc) = history.get(..=index).and_then(|h| roc_at(h, self.lookback)) else {
            return Ok(Signal::Hold);
        };
        if roc > self.threshold {
            Ok(Signal::Buy)
        } else if roc < -self.threshold {
            Ok(Signal::Sell)
        } else {
            Ok(Signal::Hold)
        }
    }
}
