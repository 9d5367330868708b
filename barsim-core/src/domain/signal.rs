//! Signal — a strategy's per-bar trading decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::strategy::StrategyFault;

/// Trading decision for the current bar.
///
/// A signal that does not match the current position (Buy while invested,
/// Sell while flat) is a no-op in the simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `buy`/`sell`/`hold` in any case, and the numeric forms `1`/`-1`/`0`
/// that classifier outputs are commonly written as.
impl FromStr for Signal {
    type Err = StrategyFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "buy" | "1" | "+1" => Ok(Self::Buy),
            "sell" | "-1" => Ok(Self::Sell),
            "hold" | "0" => Ok(Self::Hold),
            _ => Err(StrategyFault::UnknownSignal(trimmed.to_string())),
        }
    }
}
