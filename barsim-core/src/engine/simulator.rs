//! Bar-by-bar simulator — the heart of the backtesting engine.
//!
//! One `Simulator` per run. `run` consumes it, so the trade and equity logs
//! are built fresh for every backtest and handed back by value.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Bar, EquityRecord, PositionState, Signal, Trade, TradeSide};
use crate::strategy::{Strategy, StrategyFault};

use super::state::SimulationOutput;

/// Errors from a simulator run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("initial capital must be finite and > 0 (got {0})")]
    NonPositiveCapital(f64),

    #[error("bar {index} ({date}) has an untradeable close price: {close}")]
    MalformedBar {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("strategy fault at bar {index} ({date}): {source}")]
    Strategy {
        index: usize,
        date: NaiveDate,
        #[source]
        source: StrategyFault,
    },
}

/// All-in/all-out simulator with immediate fills at the bar close.
#[derive(Debug)]
pub struct Simulator {
    initial_capital: f64,
    position: PositionState,
    records: Vec<EquityRecord>,
    trades: Vec<Trade>,
}

impl Simulator {
    pub fn new(initial_capital: f64) -> Result<Self, SimulationError> {
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(SimulationError::NonPositiveCapital(initial_capital));
        }
        Ok(Self {
            initial_capital,
            position: PositionState::new(initial_capital),
            records: Vec::new(),
            trades: Vec::new(),
        })
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Replay `bars` through `strategy`.
    ///
    /// Bars are validated up front: the series must be non-empty and every
    /// close finite and positive. Timestamp ordering is the caller's
    /// precondition and is not checked here.
    pub fn run<S>(mut self, bars: &[Bar], strategy: &S) -> Result<SimulationOutput, SimulationError>
    where
        S: Strategy + ?Sized,
    {
        validate_bars(bars)?;

        info!(
            strategy = strategy.name(),
            bars = bars.len(),
            initial_capital = self.initial_capital,
            "starting simulation"
        );

        self.records.reserve_exact(bars.len());

        for (index, bar) in bars.iter().enumerate() {
            let price = bar.close;
            let signal = strategy
                .decide(&bars[..=index], index)
                .map_err(|source| SimulationError::Strategy {
                    index,
                    date: bar.date,
                    source,
                })?;

            self.apply(signal, bar);

            debug_assert!(
                self.position.capital == 0.0 || self.position.shares == 0.0,
                "capital and shares both positive at bar {index}"
            );

            self.records.push(EquityRecord {
                date: bar.date,
                price,
                position: self.position.shares,
                capital: self.position.capital,
                equity: self.position.value(price),
            });
        }

        let output = SimulationOutput {
            records: self.records,
            trades: self.trades,
        };

        info!(
            strategy = strategy.name(),
            trades = output.trades.len(),
            final_equity = output.final_equity().unwrap_or(self.initial_capital),
            "simulation finished"
        );

        Ok(output)
    }

    /// Apply one signal at the bar close. Signals that don't match the current
    /// position are no-ops.
    fn apply(&mut self, signal: Signal, bar: &Bar) {
        let price = bar.close;
        match signal {
            Signal::Buy if self.position.is_flat() => {
                let Some(shares) = self.position.enter(price) else {
                    debug!(
                        date = %bar.date,
                        price,
                        capital = self.position.capital,
                        "buy skipped: capital buys no shares"
                    );
                    return;
                };
                debug!(date = %bar.date, price, shares, "buy");
                self.trades.push(Trade {
                    date: bar.date,
                    side: TradeSide::Buy,
                    price,
                    shares,
                });
            }
            Signal::Sell if self.position.is_invested() => {
                let shares = self.position.exit(price);
                debug!(date = %bar.date, price, shares, "sell");
                self.trades.push(Trade {
                    date: bar.date,
                    side: TradeSide::Sell,
                    price,
                    shares,
                });
            }
            Signal::Buy | Signal::Sell | Signal::Hold => {}
        }
    }
}

/// Run a fresh simulator over `bars`.
pub fn simulate<S>(
    bars: &[Bar],
    strategy: &S,
    initial_capital: f64,
) -> Result<SimulationOutput, SimulationError>
where
    S: Strategy + ?Sized,
{
    Simulator::new(initial_capital)?.run(bars, strategy)
}

fn validate_bars(bars: &[Bar]) -> Result<(), SimulationError> {
    if bars.is_empty() {
        return Err(SimulationError::EmptySeries);
    }
    if let Some((index, bar)) = bars.iter().enumerate().find(|(_, b)| !b.is_valid_close()) {
        return Err(SimulationError::MalformedBar {
            index,
            date: bar.date,
            close: bar.close,
        });
    }
    Ok(())
}
