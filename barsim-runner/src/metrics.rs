//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity trace and/or trade log in, scalar
//! out. Nothing here can fail; empty or single-bar inputs produce the neutral
//! values (0 for ratios, the initial capital for final equity).

use barsim_core::domain::{equity_curve, pair_round_trips, EquityRecord, Trade};
use serde::{Deserialize, Serialize};

/// Trading days per year used to annualize the Sharpe ratio.
pub const ANNUALIZATION_DAYS: f64 = 252.0;

/// Summary metrics for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub num_trades: usize,
    pub final_equity: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from the equity trace and trade log.
    pub fn compute(records: &[EquityRecord], trades: &[Trade], initial_capital: f64) -> Self {
        let equity = equity_curve(records);
        let final_equity = final_equity(&equity, initial_capital);
        Self {
            total_return: total_return(final_equity, initial_capital),
            sharpe_ratio: sharpe_ratio(&equity),
            max_drawdown: max_drawdown(&equity),
            win_rate: win_rate(trades),
            num_trades: num_round_trips(trades),
            final_equity,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Equity at the last bar, or `initial_capital` when nothing was simulated.
pub fn final_equity(equity_curve: &[f64], initial_capital: f64) -> f64 {
    equity_curve.last().copied().unwrap_or(initial_capital)
}

/// `final_equity / initial_capital - 1`. Zero for non-positive capital.
pub fn total_return(final_equity: f64, initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    final_equity / initial_capital - 1.0
}

/// Annualized Sharpe ratio of per-bar simple returns (risk-free rate 0).
///
/// `mean(r) / std(r) * sqrt(252)` with the sample standard deviation.
/// Returns 0.0 when there are fewer than two returns or the sample standard
/// deviation is not strictly positive.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = bar_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if !std.is_finite() || std <= 0.0 {
        return 0.0;
    }
    (mean / std) * ANNUALIZATION_DAYS.sqrt()
}

/// Maximum drawdown from the running peak, as a non-positive fraction
/// (e.g., -0.15 = 15% below the peak).
///
/// Returns 0.0 if equity never dips below a prior peak.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Completed Buy→Sell round trips: `floor(len / 2)`.
pub fn num_round_trips(trades: &[Trade]) -> usize {
    trades.len() / 2
}

/// Fraction of round trips whose exit price beat the entry price.
///
/// Trades are paired positionally (Buy at `2m`, Sell at `2m + 1`).
pub fn win_rate(trades: &[Trade]) -> f64 {
    let completed = num_round_trips(trades);
    if completed == 0 {
        return 0.0;
    }
    let wins = pair_round_trips(trades)
        .iter()
        .filter(|t| t.is_winner())
        .count();
    wins as f64 / completed as f64
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Per-bar simple returns `equity[k] / equity[k-1] - 1` for k >= 1.
pub fn bar_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                w[1] / w[0] - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
