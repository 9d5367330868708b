//! Run output: the per-bar trace and the trade log.

use serde::{Deserialize, Serialize};

use crate::domain::{pair_round_trips, EquityRecord, RoundTrip, Trade};

/// Everything one simulator run produced. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// One record per input bar, same order.
    pub records: Vec<EquityRecord>,
    /// Executed transitions, alternating Buy, Sell, Buy, ...
    pub trades: Vec<Trade>,
}

impl SimulationOutput {
    /// True if the run finished without an open position.
    pub fn ends_flat(&self) -> bool {
        self.trades.len() % 2 == 0
    }

    /// Equity at the last bar, if any bar was processed.
    pub fn final_equity(&self) -> Option<f64> {
        self.records.last().map(|r| r.equity)
    }

    /// Completed Buy→Sell pairs.
    pub fn round_trips(&self) -> Vec<RoundTrip> {
        pair_round_trips(&self.trades)
    }
}
