//! Batch runs: many strategies over the same bars, optionally in parallel.
//!
//! Every run gets its own `Simulator`; the bars are shared read-only.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::StrategyConfig;
use crate::data_loader::LoadedData;
use crate::fitness::FitnessMetric;
use crate::runner::{run_backtest_from_data, BacktestResult, RunContext, RunError};

/// Built-in strategy presets used by `compare`.
pub fn presets() -> Vec<StrategyConfig> {
    let mut configs = vec![StrategyConfig::BuyAndHold];
    configs.extend(ma_crossover_grid(&[10, 20, 50], &[50, 100, 200]));
    configs.extend([20, 60, 120].map(|lookback| StrategyConfig::Momentum {
        lookback,
        threshold: 0.0,
    }));
    configs
}

/// Every `(fast, slow)` pair from the two lists, skipping `fast >= slow`.
pub fn ma_crossover_grid(fasts: &[usize], slows: &[usize]) -> Vec<StrategyConfig> {
    let mut configs = Vec::new();
    for &fast in fasts {
        for &slow in slows {
            if fast >= slow {
                continue;
            }
            configs.push(StrategyConfig::MaCrossover { fast, slow });
        }
    }
    configs
}

/// A run that could not produce a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRun {
    pub strategy: String,
    pub reason: String,
}

/// Results of a batch, in input order until ranked.
#[derive(Debug, Clone, Default)]
pub struct BatchResults {
    pub results: Vec<BacktestResult>,
    pub skipped: Vec<SkippedRun>,
}

impl BatchResults {
    /// Sort results best first by `metric`.
    pub fn rank(&mut self, metric: FitnessMetric) {
        self.results
            .sort_by(|a, b| metric.best_first(&a.metrics, &b.metrics));
    }

    /// Best result by `metric`, if any run succeeded.
    pub fn best(&self, metric: FitnessMetric) -> Option<&BacktestResult> {
        self.results
            .iter()
            .min_by(|a, b| metric.best_first(&a.metrics, &b.metrics))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Batch executor.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    initial_capital: f64,
    parallel: bool,
}

impl BatchRunner {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every config over `data`. Configs that fail to build or simulate
    /// are logged and reported in `skipped`; they never abort the batch.
    pub fn run(&self, data: &LoadedData, configs: &[StrategyConfig]) -> BatchResults {
        info!(
            symbol = %data.symbol,
            runs = configs.len(),
            parallel = self.parallel,
            "starting batch"
        );

        let outcomes: Vec<(String, Result<BacktestResult, RunError>)> = if self.parallel {
            configs
                .par_iter()
                .map(|config| (config.label(), self.run_one(data, config)))
                .collect()
        } else {
            configs
                .iter()
                .map(|config| (config.label(), self.run_one(data, config)))
                .collect()
        };

        let mut batch = BatchResults::default();
        for (label, outcome) in outcomes {
            match outcome {
                Ok(result) => batch.results.push(result),
                Err(e) => {
                    warn!(strategy = %label, error = %e, "skipping run");
                    batch.skipped.push(SkippedRun {
                        strategy: label,
                        reason: e.to_string(),
                    });
                }
            }
        }
        batch
    }

    fn run_one(&self, data: &LoadedData, config: &StrategyConfig) -> Result<BacktestResult, RunError> {
        let strategy = config.build(data.signals.as_deref())?;
        run_backtest_from_data(
            &data.bars,
            strategy.as_ref(),
            self.initial_capital,
            &RunContext {
                symbol: &data.symbol,
                config_hash: "",
                dataset_hash: &data.dataset_hash,
                has_synthetic: data.has_synthetic,
            },
        )
    }
}
