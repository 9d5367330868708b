//! Hand-written decisions keyed by bar index; Hold everywhere else.

use std::collections::BTreeMap;

use crate::domain::{Bar, Signal};
use crate::strategy::{Strategy, StrategyFault};

#[derive(Debug, Clone, Default)]
pub struct Scripted {
    script: BTreeMap<usize, Signal>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decision at `index`, replacing any earlier one.
    pub fn at(mut self, index: usize, signal: Signal) -> Self {
        self.script.insert(index, signal);
        self
    }
}

impl FromIterator<(usize, Signal)> for Scripted {
    fn from_iter<I: IntoIterator<Item = (usize, Signal)>>(iter: I) -> Self {
        Self {
            script: iter.into_iter().collect(),
        }
    }
}

impl Strategy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn decide(&self, _history: &[Bar], index: usize) -> Result<Signal, StrategyFault> {
        Ok(self.script.get(&index).copied().unwrap_or_default())
    }
}
