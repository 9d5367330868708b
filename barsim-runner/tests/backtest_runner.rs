use std::path::Path;

use barsim_runner::export::{export_metrics_csv, load_artifacts, save_artifacts};
use barsim_runner::{
    run_single_backtest, BacktestConfig, BatchRunner, FitnessMetric, RunError, StrategyConfig,
};

const PRICES: &str = "\
date,close,signal
2024-01-02,100,BUY
2024-01-03,110,HOLD
2024-01-04,90,SELL
2024-01-05,120,HOLD
";

fn write_fixture(dir: &Path, strategy_toml: &str) -> std::path::PathBuf {
    std::fs::write(dir.join("prices.csv"), PRICES).unwrap();
    let config_path = dir.join("run.toml");
    std::fs::write(
        &config_path,
        format!(
            "[backtest]\ndata = \"prices.csv\"\nsymbol = \"TEST\"\ninitial_capital = 1000.0\n\n[strategy]\n{strategy_toml}\n"
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn signal_column_scenario_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_fixture(dir.path(), "type = \"signal_column\"");
    let config = BacktestConfig::from_file(&config_path).unwrap();
    let result = run_single_backtest(&config).unwrap();

    assert_eq!(result.equity_curve(), vec![1_000.0, 1_100.0, 900.0, 900.0]);
    assert_eq!(result.trades.len(), 2);

    let m = &result.metrics;
    assert!((m.total_return - (-0.10)).abs() < 1e-12);
    assert!((m.max_drawdown - (-200.0 / 1_100.0)).abs() < 1e-12);
    assert_eq!(m.num_trades, 1);
    assert_eq!(m.win_rate, 0.0);
    assert_eq!(m.final_equity, 900.0);
    assert!(!result.has_synthetic);
    assert!(!result.dataset_hash.is_empty());
}

#[test]
fn buy_and_hold_on_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_fixture(dir.path(), "type = \"buy_and_hold\"");
    let config = BacktestConfig::from_file(&config_path).unwrap();
    let result = run_single_backtest(&config).unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.metrics.num_trades, 0);
    assert!((result.metrics.total_return - 0.20).abs() < 1e-12);
}

#[test]
fn date_window_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_fixture(dir.path(), "type = \"signal_column\"");
    let mut config = BacktestConfig::from_file(&config_path).unwrap();
    config.backtest.start_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 3);
    let result = run_single_backtest(&config).unwrap();

    assert_eq!(result.bar_count, 3);
    // The BUY row was cut, so the SELL has nothing to close.
    assert!(result.trades.is_empty());
    assert_eq!(result.metrics.final_equity, 1_000.0);
}

#[test]
fn missing_data_file_is_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_fixture(dir.path(), "type = \"buy_and_hold\"");
    std::fs::remove_file(dir.path().join("prices.csv")).unwrap();
    let config = BacktestConfig::from_file(&config_path).unwrap();
    assert!(matches!(run_single_backtest(&config), Err(RunError::Data(_))));
}

#[test]
fn artifacts_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_fixture(dir.path(), "type = \"signal_column\"");
    let config = BacktestConfig::from_file(&config_path).unwrap();
    let result = run_single_backtest(&config).unwrap();

    let out = dir.path().join("out");
    let run_dir = save_artifacts(&result, &out).unwrap();
    let reloaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(reloaded.metrics, result.metrics);
    assert_eq!(reloaded.trades, result.trades);
    assert_eq!(reloaded.config_hash, config.config_hash());
}

#[test]
fn batch_ranking_is_deterministic() {
    let data = barsim_runner::synthetic("SYN", 400, 99);
    let mut configs = barsim_runner::presets();
    configs.push(StrategyConfig::MaCrossover { fast: 5, slow: 30 });

    let mut a = BatchRunner::new(10_000.0).run(&data, &configs);
    let mut b = BatchRunner::new(10_000.0)
        .with_parallelism(false)
        .run(&data, &configs);
    a.rank(FitnessMetric::Sharpe);
    b.rank(FitnessMetric::Sharpe);

    let names_a: Vec<&str> = a.results.iter().map(|r| r.strategy.as_str()).collect();
    let names_b: Vec<&str> = b.results.iter().map(|r| r.strategy.as_str()).collect();
    assert_eq!(names_a, names_b);
    assert_eq!(
        export_metrics_csv(&a.results).unwrap(),
        export_metrics_csv(&b.results).unwrap()
    );
}
