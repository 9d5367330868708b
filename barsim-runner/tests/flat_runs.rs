use barsim_core::domain::Bar;
use barsim_core::simulate;
use barsim_core::strategies::Scripted;
use barsim_runner::PerformanceMetrics;
use chrono::NaiveDate;

fn bars(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::from_close(start + chrono::Duration::days(i as i64), c))
        .collect()
}

#[test]
fn all_hold_run_has_neutral_metrics() {
    let out = simulate(&bars(&[100.0, 110.0, 90.0, 120.0]), &Scripted::new(), 1_000.0).unwrap();
    let m = PerformanceMetrics::compute(&out.records, &out.trades, 1_000.0);

    assert_eq!(m.total_return, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
    assert_eq!(m.max_drawdown, 0.0);
    assert_eq!(m.win_rate, 0.0);
    assert_eq!(m.num_trades, 0);
    assert_eq!(m.final_equity, 1_000.0);
}

#[test]
fn single_bar_run_has_neutral_metrics() {
    let out = simulate(&bars(&[100.0]), &Scripted::new(), 1_000.0).unwrap();
    let m = PerformanceMetrics::compute(&out.records, &out.trades, 1_000.0);

    assert_eq!(out.records.len(), 1);
    assert_eq!(m.total_return, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
    assert_eq!(m.max_drawdown, 0.0);
    assert_eq!(m.final_equity, 1_000.0);
}

#[test]
fn single_bar_buy_is_marked_at_entry() {
    let strategy = Scripted::new().at(0, barsim_core::Signal::Buy);
    let out = simulate(&bars(&[100.0]), &strategy, 1_000.0).unwrap();
    let m = PerformanceMetrics::compute(&out.records, &out.trades, 1_000.0);

    assert_eq!(out.trades.len(), 1);
    assert_eq!(m.total_return, 0.0);
    assert_eq!(m.num_trades, 0);
    assert_eq!(m.final_equity, 1_000.0);
}
