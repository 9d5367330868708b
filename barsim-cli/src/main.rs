//! barsim CLI — run, compare, and inspect backtests.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file or command-line flags
//! - `compare` — run every built-in preset over one series and rank them
//! - `inspect` — reload a saved artifact directory and print its summary

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use barsim_runner::config::DEFAULT_INITIAL_CAPITAL;
use barsim_runner::export::{export_metrics_csv, load_artifacts, save_artifacts};
use barsim_runner::{
    load_bars, presets, run_single_backtest, BacktestConfig, BacktestResult, BacktestSection,
    BatchRunner, FitnessMetric, StrategyConfig,
};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "barsim",
    about = "barsim CLI — bar-by-bar backtesting of long-only signal strategies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log verbosity: trace, debug, info, warn, error.
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file or flags.
    Run {
        /// Path to a TOML config file. Overrides every other data/strategy flag.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV price file with a date and close column.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Generate this many synthetic bars instead of reading --data.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Strategy: buy_and_hold, ma_crossover, momentum, signal_column.
        #[arg(long, default_value = "buy_and_hold")]
        strategy: String,

        /// Fast SMA period (ma_crossover).
        #[arg(long, default_value_t = 10)]
        fast: usize,

        /// Slow SMA period (ma_crossover).
        #[arg(long, default_value_t = 50)]
        slow: usize,

        /// Lookback in bars (momentum).
        #[arg(long, default_value_t = 20)]
        lookback: usize,

        /// Minimum rate of change to go long (momentum).
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,

        #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
        capital: f64,

        #[arg(long, default_value = "UNKNOWN")]
        symbol: String,

        /// Write manifest.json and CSV artifacts here.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the full result as JSON instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run every built-in preset over one series and print a ranked table.
    Compare {
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long)]
        synthetic: Option<usize>,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
        capital: f64,

        #[arg(long, default_value = "UNKNOWN")]
        symbol: String,

        /// Ranking metric: sharpe, total_return, max_drawdown, win_rate, final_equity.
        #[arg(long, default_value = "sharpe")]
        rank_by: FitnessMetric,

        /// Run strategies one at a time instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Also write the ranked table to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the summary of a saved artifact directory.
    Inspect {
        dir: PathBuf,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Run {
            config,
            data,
            synthetic,
            seed,
            strategy,
            fast,
            slow,
            lookback,
            threshold,
            capital,
            symbol,
            output_dir,
            json,
        } => {
            let backtest_config = match config {
                Some(path) => BacktestConfig::from_file(&path)?,
                None => {
                    let strategy = parse_strategy(&strategy, fast, slow, lookback, threshold)?;
                    let backtest = section(data, synthetic, seed, capital, symbol)?;
                    let config = BacktestConfig { backtest, strategy };
                    config.validate()?;
                    config
                }
            };
            run_backtest_cmd(&backtest_config, output_dir.as_deref(), json)
        }
        Commands::Compare {
            data,
            synthetic,
            seed,
            capital,
            symbol,
            rank_by,
            sequential,
            csv,
        } => {
            let backtest = section(data, synthetic, seed, capital, symbol)?;
            run_compare(&backtest, rank_by, sequential, csv.as_deref())
        }
        Commands::Inspect { dir, json } => run_inspect(&dir, json),
    }
}

fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("unknown log level '{other}'. Valid: trace, debug, info, warn, error"),
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")
}

fn parse_strategy(
    name: &str,
    fast: usize,
    slow: usize,
    lookback: usize,
    threshold: f64,
) -> Result<StrategyConfig> {
    let strategy = match name {
        "buy_and_hold" => StrategyConfig::BuyAndHold,
        "ma_crossover" => StrategyConfig::MaCrossover { fast, slow },
        "momentum" => StrategyConfig::Momentum {
            lookback,
            threshold,
        },
        "signal_column" => StrategyConfig::SignalColumn,
        _ => bail!(
            "unknown strategy '{name}'. Valid: buy_and_hold, ma_crossover, momentum, signal_column"
        ),
    };
    Ok(strategy)
}

fn section(
    data: Option<PathBuf>,
    synthetic: Option<usize>,
    seed: u64,
    initial_capital: f64,
    symbol: String,
) -> Result<BacktestSection> {
    if data.is_some() && synthetic.is_some() {
        bail!("--data and --synthetic are mutually exclusive");
    }
    if data.is_none() && synthetic.is_none() {
        bail!("one of --data or --synthetic is required");
    }
    Ok(BacktestSection {
        data,
        symbol,
        initial_capital,
        start_date: None,
        end_date: None,
        synthetic_bars: synthetic.unwrap_or(0),
        seed,
    })
}

fn run_backtest_cmd(config: &BacktestConfig, output_dir: Option<&Path>, json: bool) -> Result<()> {
    let result = run_single_backtest(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&result, dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_compare(
    backtest: &BacktestSection,
    rank_by: FitnessMetric,
    sequential: bool,
    csv_path: Option<&Path>,
) -> Result<()> {
    let data = load_bars(backtest)?;
    let mut configs = presets();
    if data.signals.is_some() {
        configs.push(StrategyConfig::SignalColumn);
    }

    let mut batch = BatchRunner::new(backtest.initial_capital)
        .with_parallelism(!sequential)
        .run(&data, &configs);
    if batch.is_empty() {
        bail!("every strategy run failed; see warnings above");
    }
    batch.rank(rank_by);
    info!(ranked = batch.len(), skipped = batch.skipped.len(), metric = rank_by.as_str(), "compare done");

    println!();
    println!(
        "=== {}: {} bars, ranked by {} ===",
        data.symbol,
        data.bars.len(),
        rank_by.as_str()
    );
    println!(
        "{:<4} {:<22} {:>10} {:>8} {:>10} {:>8} {:>7} {:>14}",
        "#", "Strategy", "Return", "Sharpe", "MaxDD", "WinRate", "Trips", "Final Equity"
    );
    for (rank, r) in batch.results.iter().enumerate() {
        let m = &r.metrics;
        println!(
            "{:<4} {:<22} {:>9.2}% {:>8.3} {:>9.2}% {:>7.1}% {:>7} {:>14.2}",
            rank + 1,
            r.strategy,
            m.total_return * 100.0,
            m.sharpe_ratio,
            m.max_drawdown * 100.0,
            m.win_rate * 100.0,
            m.num_trades,
            m.final_equity
        );
    }
    for skipped in &batch.skipped {
        println!("skipped {}: {}", skipped.strategy, skipped.reason);
    }
    if data.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();

    if let Some(path) = csv_path {
        let table = export_metrics_csv(&batch.results)?;
        std::fs::write(path, table)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Ranking saved to: {}", path.display());
    }

    Ok(())
}

fn run_inspect(dir: &Path, json: bool) -> Result<()> {
    let result = load_artifacts(dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", result.symbol);
    println!("Strategy:       {}", result.strategy);
    println!(
        "Period:         {} to {}",
        result.start_date, result.end_date
    );
    println!("Bars:           {}", result.bar_count);
    println!("Trades:         {} ({} round trips)", result.trades.len(), m.num_trades);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", m.total_return * 100.0);
    println!("Sharpe:         {:.3}", m.sharpe_ratio);
    println!("Max Drawdown:   {:.2}%", m.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", m.win_rate * 100.0);
    println!("Final Equity:   {:.2}", m.final_equity);
    println!("Dataset Hash:   {}", result.dataset_hash);
    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
