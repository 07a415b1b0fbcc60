//! Average True Range with Wilder smoothing.
//!
//! TR[t] = max(high-low, |high-prev_close|, |low-prev_close|).
//! TR[0] has no previous close and is excluded from the seed, so the first
//! defined ATR lands at index `period`.

use crate::domain::Bar;

/// True range series. TR[0] is NaN (no previous close).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// Wilder smoothing (alpha = 1/period) over a series with a possible NaN
/// prefix. Seed: mean of the first `period` defined values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 {
        return result;
    }

    let first_defined = match values.iter().position(|v| !v.is_nan()) {
        Some(i) => i,
        None => return result,
    };
    let seed_end = first_defined + period;
    if seed_end > n || values[first_defined..seed_end].iter().any(|v| v.is_nan()) {
        return result;
    }

    let seed = values[first_defined..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// ATR series aligned to the bars.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    wilder_smooth(&true_range(bars), period)
}
