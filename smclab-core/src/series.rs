//! Bar series integrity checks.
//!
//! All checks run before any trade logic executes; a failure aborts the run
//! with the offending bar attached. The core never produces a partial ledger
//! from a series that fails integrity.

use crate::domain::Bar;
use thiserror::Error;

/// Fatal data integrity failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("timestamps not strictly increasing at bar {index}")]
    NonMonotonicTimestamp { index: usize },

    #[error("OHLC invariant violated at bar {index}")]
    OhlcInvariant { index: usize },

    #[error("insufficient history: {actual} bars, need at least {required}")]
    InsufficientHistory { required: usize, actual: usize },
}

/// Validate a bar series against the configured warmup requirement.
///
/// Checks, in order: per-bar OHLC sanity, strictly increasing timestamps,
/// and enough bars to cover the longest lookback window plus one decision bar.
pub fn validate_series(bars: &[Bar], warmup_bars: usize) -> Result<(), DataError> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(DataError::OhlcInvariant { index });
        }
    }
    for index in 1..bars.len() {
        if bars[index].timestamp <= bars[index - 1].timestamp {
            return Err(DataError::NonMonotonicTimestamp { index });
        }
    }
    let required = warmup_bars + 1;
    if bars.len() < required {
        return Err(DataError::InsufficientHistory {
            required,
            actual: bars.len(),
        });
    }
    Ok(())
}
