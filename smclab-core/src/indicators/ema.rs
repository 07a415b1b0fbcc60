//! Exponential Moving Average.
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Seed: SMA of the first `period` defined values. Values before the seed are
//! NaN, which downstream scoring treats as "factor absent".

/// EMA over an arbitrary series. Leading NaNs are skipped (the seed window
/// starts at the first defined value), so this also works on derived series
/// such as the MACD line. A NaN after the seed taints everything from there on.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n == 0 {
        return result;
    }

    let first_defined = match values.iter().position(|v| !v.is_nan()) {
        Some(i) => i,
        None => return result,
    };
    let seed_end = first_defined + period;
    if seed_end > n {
        return result;
    }

    let seed_window = &values[first_defined..seed_end];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }
    let seed = seed_window.iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
