//! Fitness function — configurable metric selector for strategy ranking.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::metrics::PerformanceMetrics;

/// Which metric to rank by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMetric {
    #[default]
    Sharpe,
    TotalReturn,
    MaxDrawdown,
    WinRate,
    FinalEquity,
}

impl FitnessMetric {
    pub const ALL: [FitnessMetric; 5] = [
        Self::Sharpe,
        Self::TotalReturn,
        Self::MaxDrawdown,
        Self::WinRate,
        Self::FinalEquity,
    ];

    /// Extract the relevant metric value from a PerformanceMetrics struct.
    pub fn extract(&self, metrics: &PerformanceMetrics) -> f64 {
        match self {
            Self::Sharpe => metrics.sharpe_ratio,
            Self::TotalReturn => metrics.total_return,
            Self::MaxDrawdown => metrics.max_drawdown,
            Self::WinRate => metrics.win_rate,
            Self::FinalEquity => metrics.final_equity,
        }
    }

    /// Ordering that sorts best first. Non-finite values sort last.
    ///
    /// Larger is better for every metric: for MaxDrawdown, -0.05 beats -0.20.
    pub fn best_first(&self, a: &PerformanceMetrics, b: &PerformanceMetrics) -> Ordering {
        let (x, y) = (self.extract(a), self.extract(b));
        match (x.is_finite(), y.is_finite()) {
            (true, true) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sharpe => "sharpe",
            Self::TotalReturn => "total_return",
            Self::MaxDrawdown => "max_drawdown",
            Self::WinRate => "win_rate",
            Self::FinalEquity => "final_equity",
        }
    }
}

impl FromStr for FitnessMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown metric '{s}'. Valid: {}", valid.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> PerformanceMetrics {
        PerformanceMetrics {
            total_return: 0.15,
            sharpe_ratio: 1.5,
            max_drawdown: -0.10,
            win_rate: 0.55,
            num_trades: 20,
            final_equity: 11_500.0,
        }
    }

    #[test]
    fn extract_sharpe() {
        let m = sample_metrics();
        assert!((FitnessMetric::Sharpe.extract(&m) - 1.5).abs() < 1e-10);
    }

    #[test]
    fn extract_max_drawdown() {
        let m = sample_metrics();
        assert!((FitnessMetric::MaxDrawdown.extract(&m) - (-0.10)).abs() < 1e-10);
    }

    #[test]
    fn default_is_sharpe() {
        assert_eq!(FitnessMetric::default(), FitnessMetric::Sharpe);
    }

    #[test]
    fn smaller_drawdown_ranks_first() {
        let mut shallow = sample_metrics();
        shallow.max_drawdown = -0.05;
        let mut deep = sample_metrics();
        deep.max_drawdown = -0.20;
        assert_eq!(
            FitnessMetric::MaxDrawdown.best_first(&shallow, &deep),
            Ordering::Less
        );
    }

    #[test]
    fn best_first_puts_nan_last() {
        let good = sample_metrics();
        let mut bad = sample_metrics();
        bad.sharpe_ratio = f64::NAN;
        assert_eq!(FitnessMetric::Sharpe.best_first(&good, &bad), Ordering::Less);
        assert_eq!(FitnessMetric::Sharpe.best_first(&bad, &good), Ordering::Greater);
    }

    #[test]
    fn parses_names() {
        for m in FitnessMetric::ALL {
            assert_eq!(m.as_str().parse::<FitnessMetric>().unwrap(), m);
        }
        assert!("calmar".parse::<FitnessMetric>().is_err());
    }
}
