//! Replay of a precomputed signal column.
//!
//! Wraps externally produced decisions (a model's predictions, a `signal`
//! column in the price file) so they plug into the simulator like any rule.

use crate::domain::{Bar, Signal};
use crate::strategy::{Strategy, StrategyFault};

#[derive(Debug, Clone)]
pub struct SignalSeries {
    signals: Vec<Signal>,
    name: String,
}

impl SignalSeries {
    pub fn new(signals: Vec<Signal>) -> Self {
        Self::named("signal_series", signals)
    }

    pub fn named(name: impl Into<String>, signals: Vec<Signal>) -> Self {
        Self {
            signals,
            name: name.into(),
        }
    }

    /// Parse raw signal text, failing on the first unrecognized value.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, StrategyFault> {
        let signals = raw
            .iter()
            .map(|s| s.as_ref().parse::<Signal>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(signals))
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl Strategy for SignalSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, _history: &[Bar], index: usize) -> Result<Signal, StrategyFault> {
        self.signals
            .get(index)
            .copied()
            .ok_or(StrategyFault::MissingSignal {
                index,
                available: self.signals.len(),
            })
    }
}
