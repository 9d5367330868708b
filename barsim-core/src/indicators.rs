//! Point-in-time indicators evaluated at the last bar of a history slice.
//!
//! Strategies receive `&bars[..=index]`, so every helper here reads backwards
//! from `history.last()` and can never touch a later bar.

use crate::domain::Bar;

/// Simple moving average of the last `period` closes ending at `end` (inclusive).
///
/// Returns `None` during warmup (`end + 1 < period`), for `period == 0`, or if
/// any close in the window is NaN.
pub fn sma_ending_at(history: &[Bar], end: usize, period: usize) -> Option<f64> {
    if period == 0 || end >= history.len() || end + 1 < period {
        return None;
    }
    let window = &history[end + 1 - period..=end];
    let sum: f64 = window.iter().map(|b| b.close).sum();
    if sum.is_nan() {
        return None;
    }
    Some(sum / period as f64)
}

/// Simple moving average of the last `period` closes of `history`.
pub fn sma_at(history: &[Bar], period: usize) -> Option<f64> {
    let end = history.len().checked_sub(1)?;
    sma_ending_at(history, end, period)
}

/// Rate of change over `lookback` bars as a fraction:
/// `close[t] / close[t - lookback] - 1`.
///
/// Returns `None` during warmup, for `lookback == 0`, or when the reference
/// close is zero or NaN.
pub fn roc_at(history: &[Bar], lookback: usize) -> Option<f64> {
    if lookback == 0 || history.len() <= lookback {
        return None;
    }
    let t = history.len() - 1;
    let prev = history[t - lookback].close;
    let curr = history[t].close;
    if prev.is_nan() || curr.is_nan() || prev == 0.0 {
        return None;
    }
    Some(curr / prev - 1.0)
}

/// Create bars from close prices, one per day from 2024-01-01.
#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::from_close(start + chrono::Duration::days(i as i64), c))
        .collect()
}
