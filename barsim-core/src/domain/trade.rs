//! Trade log entries and the round trips paired from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of an executed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed Buy or Sell, filled at the bar close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub shares: f64,
}

impl Trade {
    /// Cash value of the fill.
    pub fn notional(&self) -> f64 {
        self.price * self.shares
    }
}

/// A completed Buy followed by its matching Sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub shares: f64,
}

impl RoundTrip {
    /// Price return of the round trip as a fraction of the entry price.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        self.exit_price / self.entry_price - 1.0
    }

    pub fn pnl(&self) -> f64 {
        (self.exit_price - self.entry_price) * self.shares
    }

    pub fn is_winner(&self) -> bool {
        self.exit_price > self.entry_price
    }
}

/// Pair the trade log positionally: Buy at index `2m`, Sell at `2m + 1`.
///
/// A trailing Buy with no closing Sell yields nothing. Pairs whose sides are
/// not Buy then Sell are skipped; the simulator never produces them.
pub fn pair_round_trips(trades: &[Trade]) -> Vec<RoundTrip> {
    trades
        .chunks_exact(2)
        .filter_map(|pair| match (&pair[0], &pair[1]) {
            (entry, exit) if entry.side == TradeSide::Buy && exit.side == TradeSide::Sell => {
                Some(RoundTrip {
                    entry_date: entry.date,
                    entry_price: entry.price,
                    exit_date: exit.date,
                    exit_price: exit.price,
                    shares: exit.shares,
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(day: u32, side: TradeSide, price: f64) -> Trade {
        Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            side,
            price,
            shares: 10.0,
        }
    }

    #[test]
    fn pairs_by_position() {
        let trades = vec![
            trade(2, TradeSide::Buy, 100.0),
            trade(3, TradeSide::Sell, 90.0),
            trade(4, TradeSide::Buy, 95.0),
            trade(5, TradeSide::Sell, 105.0),
        ];
        let trips = pair_round_trips(&trades);
        assert_eq!(trips.len(), 2);
        assert!(!trips[0].is_winner());
        assert!(trips[1].is_winner());
        assert!((trips[0].return_pct() - (-0.10)).abs() < 1e-12);
        assert!((trips[1].pnl() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn trailing_buy_is_ignored() {
        let trades = vec![
            trade(2, TradeSide::Buy, 100.0),
            trade(3, TradeSide::Sell, 110.0),
            trade(4, TradeSide::Buy, 120.0),
        ];
        let trips = pair_round_trips(&trades);
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].exit_price, 110.0);
    }

    #[test]
    fn identical_trades_still_pair_positionally() {
        // Repeated identical fills must not confuse the pairing.
        let trades = vec![
            trade(2, TradeSide::Buy, 100.0),
            trade(3, TradeSide::Sell, 100.0),
            trade(2, TradeSide::Buy, 100.0),
            trade(3, TradeSide::Sell, 100.0),
        ];
        let trips = pair_round_trips(&trades);
        assert_eq!(trips.len(), 2);
        assert!(trips.iter().all(|t| !t.is_winner()));
    }

    #[test]
    fn notional_is_price_times_shares() {
        assert_eq!(trade(2, TradeSide::Buy, 100.0).notional(), 1_000.0);
    }
}
