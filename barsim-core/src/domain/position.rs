//! PositionState — cash or shares, never both.

use serde::{Deserialize, Serialize};

/// All-in/all-out position state.
///
/// Either flat (`shares == 0`, everything in `capital`) or fully invested
/// (`shares > 0`, `capital == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub capital: f64,
    pub shares: f64,
}

impl PositionState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            capital: initial_capital,
            shares: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0.0
    }

    pub fn is_invested(&self) -> bool {
        self.shares > 0.0
    }

    /// Mark-to-market value at `price`.
    pub fn value(&self, price: f64) -> f64 {
        self.capital + self.shares * price
    }

    /// Convert all capital into shares at `price`. Returns the shares bought,
    /// or `None` (state untouched) when the capital buys no positive amount.
    pub(crate) fn enter(&mut self, price: f64) -> Option<f64> {
        let shares = self.capital / price;
        if !shares.is_finite() || shares <= 0.0 {
            return None;
        }
        self.shares = shares;
        self.capital = 0.0;
        Some(shares)
    }

    /// Convert all shares back into capital at `price`. Returns the shares sold.
    pub(crate) fn exit(&mut self, price: f64) -> f64 {
        let sold = self.shares;
        self.capital = sold * price;
        self.shares = 0.0;
        sold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat() {
        let pos = PositionState::new(1_000.0);
        assert!(pos.is_flat());
        assert!(!pos.is_invested());
        assert_eq!(pos.value(50.0), 1_000.0);
    }

    #[test]
    fn enter_then_exit() {
        let mut pos = PositionState::new(1_000.0);
        let bought = pos.enter(100.0);
        assert_eq!(bought, Some(10.0));
        assert_eq!(pos.capital, 0.0);
        assert_eq!(pos.value(110.0), 1_100.0);

        let sold = pos.exit(90.0);
        assert_eq!(sold, 10.0);
        assert!(pos.is_flat());
        assert_eq!(pos.capital, 900.0);
    }

    #[test]
    fn enter_refuses_zero_shares() {
        let mut pos = PositionState::new(5e-324);
        assert_eq!(pos.enter(3.0), None);
        assert!(pos.is_flat());
        assert_eq!(pos.capital, 5e-324);
    }
}
