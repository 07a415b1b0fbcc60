//! CSV bar loading.
//!
//! Expects a header of `timestamp,open,high,low,close,volume`. Timestamps are
//! RFC 3339, or a bare `YYYY-MM-DD` date taken as midnight UTC. Rows must be
//! sane OHLC (low <= open/close <= high, finite, non-negative volume) and
//! strictly increasing in time; the engine revalidates, but failing here
//! gives a line number.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use smclab_core::domain::Bar;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unparseable timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: OHLC values violate low <= open/close <= high")]
    InsaneBar { row: usize },

    #[error("row {row}: timestamp not after the previous row")]
    OutOfOrder { row: usize },

    #[error("{path} contains no bars")]
    Empty { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date: NaiveDate = value.parse().ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Load a full bar series from a CSV file.
pub fn load_bars(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut bars: Vec<Bar> = Vec::new();
    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = i + 2; // 1-based, after the header
        let record = record?;
        let timestamp =
            parse_timestamp(&record.timestamp).ok_or_else(|| LoadError::BadTimestamp {
                row,
                value: record.timestamp.clone(),
            })?;

        let bar = Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        };
        if !bar.is_sane() {
            return Err(LoadError::InsaneBar { row });
        }
        if let Some(prev) = bars.last() {
            if bar.timestamp <= prev.timestamp {
                return Err(LoadError::OutOfOrder { row });
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!(path = %path.display(), bars = bars.len(), "loaded bar series");
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rfc3339_and_date_timestamps() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-02T21:00:00Z,100.0,101.0,99.0,100.5,1000\n\
             2024-01-03,100.5,102.0,100.0,101.5,1200\n",
        );
        let bars = load_bars(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 100.5);
        assert!(bars[1].timestamp > bars[0].timestamp);
    }

    #[test]
    fn rejects_inverted_ohlc() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-02,100.0,99.0,101.0,100.5,1000\n",
        );
        assert!(matches!(
            load_bars(file.path()),
            Err(LoadError::InsaneBar { row: 2 })
        ));
    }

    #[test]
    fn rejects_non_increasing_timestamps() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-03,100.0,101.0,99.0,100.5,1000\n\
             2024-01-02,100.5,102.0,100.0,101.5,1200\n",
        );
        assert!(matches!(
            load_bars(file.path()),
            Err(LoadError::OutOfOrder { row: 3 })
        ));
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             yesterday,100.0,101.0,99.0,100.5,1000\n",
        );
        assert!(matches!(
            load_bars(file.path()),
            Err(LoadError::BadTimestamp { row: 2, .. })
        ));
    }

    #[test]
    fn rejects_empty_file() {
        let file = write_csv("timestamp,open,high,low,close,volume\n");
        assert!(matches!(load_bars(file.path()), Err(LoadError::Empty { .. })));
    }
}
