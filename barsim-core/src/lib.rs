//! barsim core — domain types, strategy capability, and the bar-by-bar simulator.
//!
//! This crate contains the backtesting engine itself:
//! - Domain types (bars, signals, position state, trades, equity records)
//! - The `Strategy` capability and a handful of built-in rules
//! - Point-in-time indicators used by those rules
//! - The all-in/all-out simulator with fills at the bar close
//!
//! Metrics, data loading and reporting live in `barsim-runner`.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategies;
pub mod strategy;

pub use domain::{Bar, EquityRecord, PositionState, RoundTrip, Signal, Trade, TradeSide};
pub use engine::{simulate, SimulationError, SimulationOutput, Simulator};
pub use strategy::{Strategy, StrategyFault};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain types and strategies can cross threads, so
    /// batch runners can fan out over them.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<Trade>();
        require_sync::<Trade>();
        require_send::<EquityRecord>();
        require_sync::<EquityRecord>();
        require_send::<SimulationOutput>();
        require_sync::<SimulationOutput>();
        require_send::<SimulationError>();
        require_sync::<SimulationError>();

        require_send::<strategies::BuyAndHold>();
        require_sync::<strategies::BuyAndHold>();
        require_send::<strategies::MaCrossover>();
        require_sync::<strategies::MaCrossover>();
        require_send::<strategies::Momentum>();
        require_sync::<strategies::Momentum>();
        require_send::<strategies::SignalSeries>();
        require_sync::<strategies::SignalSeries>();
        require_send::<strategies::Scripted>();
        require_sync::<strategies::Scripted>();
        require_send::<Box<dyn Strategy>>();
        require_sync::<Box<dyn Strategy>>();
    }

    /// Architecture contract: a strategy's decision takes the bar history and
    /// the index only. It cannot observe capital, shares or the trade log.
    #[test]
    fn strategy_trait_has_no_position_parameter() {
        fn _check_trait_object_builds(
            strategy: &dyn Strategy,
            bars: &[Bar],
        ) -> Result<Signal, StrategyFault> {
            strategy.decide(bars, 0)
        }
    }
}
