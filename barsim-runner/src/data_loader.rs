//! Bar loading for the runner.
//!
//! Reads a timestamp-ordered price series from CSV (or generates a seeded
//! synthetic one) and hands back bars plus provenance. Policy:
//! 1. `synthetic_bars > 0` → seeded random walk, tagged as synthetic
//! 2. otherwise → read the CSV at `data`
//! 3. apply the optional inclusive date window
//!
//! The CSV needs a header row with a date column (`date`, `timestamp`,
//! `datetime` or `time`, any case) and a `close` column. `open`, `high`,
//! `low`, `volume` and `signal` are picked up when present; an empty cell
//! falls back to the close (or 0 volume), a non-numeric one is a malformed
//! bar. Bars are daily: timestamps must sit at midnight.

use std::io::Read;
use std::path::{Path, PathBuf};

use barsim_core::domain::{Bar, Signal};
use barsim_core::StrategyFault;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::BacktestSection;

const DATE_COLUMNS: [&str; 4] = ["date", "timestamp", "datetime", "time"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: malformed bar: {reason}")]
    MalformedBar { line: u64, reason: String },

    #[error("line {line}: unparseable date '{value}'")]
    BadDate { line: u64, value: String },

    #[error("line {line}: intraday timestamp '{value}' (only daily bars at midnight are supported)")]
    IntradayTimestamp { line: u64, value: String },

    #[error("line {line}: {source}")]
    BadSignal {
        line: u64,
        #[source]
        source: StrategyFault,
    },

    #[error("line {line}: date {current} does not come after {previous}")]
    NonIncreasingDates {
        line: u64,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("no bars loaded from {0}")]
    Empty(String),
}

/// Where the bars came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Csv { path: PathBuf },
    Synthetic { seed: u64 },
}

/// Loaded bars, an optional precomputed signal column, and provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// One entry per bar when the CSV had a `signal` column.
    pub signals: Option<Vec<Signal>>,
    pub source: DataSource,
    /// BLAKE3 over dates and OHLCV values.
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

impl LoadedData {
    fn new(symbol: &str, bars: Vec<Bar>, signals: Option<Vec<Signal>>, source: DataSource) -> Self {
        let dataset_hash = compute_dataset_hash(&bars);
        let has_synthetic = matches!(source, DataSource::Synthetic { .. });
        Self {
            symbol: symbol.to_string(),
            bars,
            signals,
            source,
            dataset_hash,
            has_synthetic,
        }
    }

    /// Keep only bars within `[start, end]` (either bound optional). The signal
    /// column is cut to match and the dataset hash recomputed.
    pub fn restrict(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        if start.is_none() && end.is_none() {
            return self;
        }
        let keep = |d: NaiveDate| start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e);
        let mask: Vec<bool> = self.bars.iter().map(|b| keep(b.date)).collect();

        let bars: Vec<Bar> = self
            .bars
            .into_iter()
            .zip(&mask)
            .filter_map(|(b, &k)| k.then_some(b))
            .collect();
        let signals = self.signals.map(|sigs| {
            sigs.into_iter()
                .zip(&mask)
                .filter_map(|(s, &k)| k.then_some(s))
                .collect()
        });
        Self::new(&self.symbol, bars, signals, self.source)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

/// Resolve the `[backtest]` section into bars.
pub fn load_bars(section: &BacktestSection) -> Result<LoadedData, LoadError> {
    let loaded = if section.synthetic_bars > 0 {
        warn!(
            symbol = %section.symbol,
            bars = section.synthetic_bars,
            seed = section.seed,
            "generating synthetic data; results will be tagged as synthetic"
        );
        synthetic(&section.symbol, section.synthetic_bars, section.seed)
    } else {
        let path = section.data.as_deref().ok_or_else(|| {
            LoadError::Empty("config (no data path and no synthetic bars)".into())
        })?;
        load_csv(path, &section.symbol)?
    };

    let loaded = loaded.restrict(section.start_date, section.end_date);
    if loaded.bars.is_empty() {
        return Err(LoadError::Empty(format!(
            "{} after applying the date window",
            loaded.symbol
        )));
    }
    Ok(loaded)
}

/// Read a CSV price file.
pub fn load_csv(path: &Path, symbol: &str) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let (bars, signals) = parse_csv(file)?;
    if bars.is_empty() {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    info!(path = %path.display(), bars = bars.len(), "loaded price series");
    Ok(LoadedData::new(
        symbol,
        bars,
        signals,
        DataSource::Csv {
            path: path.to_path_buf(),
        },
    ))
}

/// Parse CSV text into bars and the optional signal column.
///
/// Dates must be strictly increasing. A missing, non-numeric, non-finite or
/// non-positive close is a malformed bar.
pub fn parse_csv<R: Read>(reader: R) -> Result<(Vec<Bar>, Option<Vec<Signal>>), LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };

    let date_col = find(&DATE_COLUMNS[..]).ok_or(LoadError::MissingColumn("date"))?;
    let close_col = find(&["close"][..]).ok_or(LoadError::MissingColumn("close"))?;
    let open_col = find(&["open"][..]);
    let high_col = find(&["high"][..]);
    let low_col = find(&["low"][..]);
    let volume_col = find(&["volume"][..]);
    let signal_col = find(&["signal"][..]);

    let mut bars = Vec::new();
    let mut signals = signal_col.map(|_| Vec::new());
    let mut previous: Option<NaiveDate> = None;

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(row as u64 + 2);

        let raw_date = record.get(date_col).unwrap_or("");
        let timestamp = parse_timestamp(raw_date).ok_or_else(|| LoadError::BadDate {
            line,
            value: raw_date.to_string(),
        })?;
        if timestamp.time() != NaiveTime::MIN {
            return Err(LoadError::IntradayTimestamp {
                line,
                value: raw_date.to_string(),
            });
        }
        let date = timestamp.date();

        if let Some(prev) = previous {
            if date <= prev {
                return Err(LoadError::NonIncreasingDates {
                    line,
                    previous: prev,
                    current: date,
                });
            }
        }
        previous = Some(date);

        let close = match record.get(close_col).filter(|s| !s.is_empty()) {
            None => {
                return Err(LoadError::MalformedBar {
                    line,
                    reason: "missing close price".into(),
                })
            }
            Some(raw) => raw.parse::<f64>().map_err(|_| LoadError::MalformedBar {
                line,
                reason: format!("close '{raw}' is not a number"),
            })?,
        };
        if !close.is_finite() || close <= 0.0 {
            return Err(LoadError::MalformedBar {
                line,
                reason: format!("close {close} must be finite and > 0"),
            });
        }

        let optional = |col: Option<usize>, name: &str| -> Result<Option<f64>, LoadError> {
            match col.and_then(|c| record.get(c)).filter(|s| !s.is_empty()) {
                None => Ok(None),
                Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| LoadError::MalformedBar {
                    line,
                    reason: format!("{name} '{raw}' is not a number"),
                }),
            }
        };

        bars.push(Bar {
            date,
            open: optional(open_col, "open")?.unwrap_or(close),
            high: optional(high_col, "high")?.unwrap_or(close),
            low: optional(low_col, "low")?.unwrap_or(close),
            close,
            volume: optional(volume_col, "volume")?.unwrap_or(0.0),
        });

        if let (Some(col), Some(sigs)) = (signal_col, signals.as_mut()) {
            let raw = record.get(col).unwrap_or("");
            let signal = if raw.is_empty() {
                Signal::Hold
            } else {
                raw.parse::<Signal>()
                    .map_err(|source| LoadError::BadSignal { line, source })?
            };
            sigs.push(signal);
        }
    }

    Ok((bars, signals))
}

/// Accepts `YYYY-MM-DD` (as midnight), `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` and RFC 3339 (in its own offset).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Synthetic series for development. Deterministic for a given seed.
pub fn synthetic(symbol: &str, n: usize, seed: u64) -> LoadedData {
    let bars = generate_synthetic_bars(n, seed);
    LoadedData::new(symbol, bars, None, DataSource::Synthetic { seed })
}

/// Random walk from 100.0 on weekdays starting 2020-01-02, ±3% per day.
pub fn generate_synthetic_bars(n: usize, seed: u64) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut current = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap_or_default();

    while bars.len() < n {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}

/// Compute a deterministic BLAKE3 hash over all bar data.
pub fn compute_dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
