//! Buy on the first bar, hold to the end.

use crate::domain::{Bar, Signal};
use crate::strategy::{Strategy, StrategyFault};

/// Benchmark strategy: fully invested from the first bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuyAndHold;

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "buy_and_hold"
    }

    fn decide(&self, _history: &[Bar], index: usize) -> Result<Signal, StrategyFault> {
        Ok(if index == 0 { Signal::Buy } else { Signal::Hold })
    }
}
