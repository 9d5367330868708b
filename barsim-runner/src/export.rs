//! Reporting and export — JSON and CSV artifact generation.
//!
//! All persisted artifacts include a `schema_version` field. Newer versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use barsim_core::domain::{EquityRecord, RoundTrip, Trade};

use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Per-bar equity records.
///
/// Columns: date, price, position, capital, equity
pub fn export_records_csv(records: &[EquityRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "price", "position", "capital", "equity"])?;
    for r in records {
        wtr.write_record([
            &r.date.to_string(),
            &format!("{:.6}", r.price),
            &format!("{:.6}", r.position),
            &format!("{:.2}", r.capital),
            &format!("{:.2}", r.equity),
        ])?;
    }
    finish(wtr)
}

/// Trade log. Columns: date, side, price, shares, notional
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "side", "price", "shares", "notional"])?;
    for t in trades {
        wtr.write_record([
            &t.date.to_string(),
            &t.side.to_string(),
            &format!("{:.6}", t.price),
            &format!("{:.6}", t.shares),
            &format!("{:.2}", t.notional()),
        ])?;
    }
    finish(wtr)
}

/// Completed round trips with per-trade P&L.
pub fn export_round_trips_csv(round_trips: &[RoundTrip]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "shares",
        "pnl",
        "return_pct",
        "winner",
    ])?;
    for rt in round_trips {
        wtr.write_record([
            &rt.entry_date.to_string(),
            &format!("{:.6}", rt.entry_price),
            &rt.exit_date.to_string(),
            &format!("{:.6}", rt.exit_price),
            &format!("{:.6}", rt.shares),
            &format!("{:.2}", rt.pnl()),
            &format!("{:.6}", rt.return_pct()),
            &rt.is_winner().to_string(),
        ])?;
    }
    finish(wtr)
}

/// One metrics row per result, in the order given.
pub fn export_metrics_csv(results: &[BacktestResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "strategy",
        "total_return",
        "sharpe_ratio",
        "max_drawdown",
        "win_rate",
        "num_trades",
        "final_equity",
        "synthetic",
    ])?;
    for r in results {
        let m = &r.metrics;
        wtr.write_record([
            &r.symbol,
            &r.strategy,
            &format!("{:.6}", m.total_return),
            &format!("{:.4}", m.sharpe_ratio),
            &format!("{:.6}", m.max_drawdown),
            &format!("{:.4}", m.win_rate),
            &m.num_trades.to_string(),
            &format!("{:.2}", m.final_equity),
            &r.has_synthetic.to_string(),
        ])?;
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates `{symbol}_{strategy}_{timestamp}/` under `output_dir` containing
/// `manifest.json`, `equity.csv`, `trades.csv` and `round_trips.csv`.
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}_{}",
        result.symbol,
        result.strategy,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let files = [
        ("manifest.json", export_json(result)?),
        ("equity.csv", export_records_csv(&result.records)?),
        ("trades.csv", export_trades_csv(&result.trades)?),
        ("round_trips.csv", export_round_trips_csv(&result.round_trips())?),
    ];
    for (name, content) in files {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory's manifest.json.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{run_backtest_from_data, RunContext};
    use barsim_core::domain::{Bar, Signal};
    use barsim_core::strategies::Scripted;
    use chrono::NaiveDate;

    fn sample_result() -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<Bar> = [100.0, 110.0, 90.0, 120.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::from_close(start + chrono::Duration::days(i as i64), c))
            .collect();
        let strategy = Scripted::new().at(0, Signal::Buy).at(2, Signal::Sell);
        run_backtest_from_data(
            &bars,
            &strategy,
            1_000.0,
            &RunContext {
                symbol: "TEST",
                config_hash: "cfg",
                dataset_hash: "data",
                has_synthetic: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn json_round_trip() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn rejects_future_schema() {
        let mut result = sample_result();
        result.schema_version = SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&result).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn missing_schema_version_defaults() {
        let result = sample_result();
        let mut value = serde_json::to_value(&result).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let back = import_json(&value.to_string()).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn records_csv_has_row_per_bar() {
        let result = sample_result();
        let csv = export_records_csv(&result.records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "date,price,position,capital,equity");
        assert!(lines[2].starts_with("2024-01-02,110.000000,10.000000,0.00,1100.00"));
    }

    #[test]
    fn trades_csv_uses_side_names() {
        let result = sample_result();
        let csv = export_trades_csv(&result.trades).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",BUY,"));
        assert!(lines[2].contains(",SELL,"));
    }

    #[test]
    fn round_trips_csv_marks_loser() {
        let result = sample_result();
        let csv = export_round_trips_csv(&result.round_trips()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",false"));
    }

    #[test]
    fn metrics_csv_row_per_result() {
        let result = sample_result();
        let csv = export_metrics_csv(&[result.clone(), result]).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().nth(1).unwrap().starts_with("TEST,scripted,-0.100000"));
    }

    #[test]
    fn save_and_load_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let result = sample_result();
        let run_dir = save_artifacts(&result, dir.path()).unwrap();
        for name in ["manifest.json", "equity.csv", "trades.csv", "round_trips.csv"] {
            assert!(run_dir.join(name).exists(), "missing {name}");
        }
        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded, result);
    }

    #[test]
    fn load_artifacts_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_artifacts(&dir.path().join("nope")).is_err());
    }
}
