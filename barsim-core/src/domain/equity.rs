//! EquityRecord — one row of the simulation trace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// State of the account at the close of one bar.
///
/// `equity == capital + position * price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRecord {
    pub date: NaiveDate,
    pub price: f64,
    /// Shares held after this bar's transition.
    pub position: f64,
    pub capital: f64,
    pub equity: f64,
}

/// Extract the equity column from a trace.
pub fn equity_curve(records: &[EquityRecord]) -> Vec<f64> {
    records.iter().map(|r| r.equity).collect()
}
