//! Bar — one time-stamped price observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// The simulator only consults `close`. The other fields are carried so that
/// strategies and exports can see the full record when the source has it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Build a bar from a close price alone (OHLC all equal to `close`, no volume).
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    /// True if the close can be traded at: finite and strictly positive.
    pub fn is_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }

    /// Basic OHLC sanity check: high >= low and both bracket open and close.
    pub fn is_sane(&self) -> bool {
        if !self.is_valid_close() || self.open.is_nan() || self.high.is_nan() || self.low.is_nan()
        {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn from_close_fills_ohlc() {
        let bar = Bar::from_close(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 42.0);
        assert_eq!(bar.open, 42.0);
        assert_eq!(bar.high, 42.0);
        assert_eq!(bar.low, 42.0);
        assert!(bar.is_sane());
    }

    #[test]
    fn rejects_nan_and_non_positive_close() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.is_valid_close());
        bar.close = 0.0;
        assert!(!bar.is_valid_close());
        bar.close = -1.0;
        assert!(!bar.is_valid_close());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }
}
