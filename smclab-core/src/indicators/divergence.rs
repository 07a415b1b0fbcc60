//! Price/indicator divergence detection.
//!
//! A swing extremum over a symmetric ±`window` needs `window` bars of
//! confirmation after it, so every flag is placed at the confirmation bar
//! (extremum index + window), never at the extremum itself. Values at bar i
//! therefore depend only on bars [0..i].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingKind {
    Low,
    High,
}

/// A confirmed local extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwingPoint {
    /// Bar index of the extremum itself.
    pub index: usize,
    /// Bar index at which the extremum became known (index + window).
    pub confirmed_at: usize,
    pub kind: SwingKind,
}

/// Lazy sequence of confirmed swing extrema over a series.
///
/// A bar is a swing low (high) when its value is the minimum (maximum) of the
/// symmetric ±`window` around it. Windows containing NaN yield nothing.
pub fn swing_points(
    series: &[f64],
    window: usize,
) -> impl Iterator<Item = SwingPoint> + '_ {
    let n = series.len();
    let lo = window.min(n);
    let hi = n.saturating_sub(window);
    (lo..hi).filter_map(move |i| {
        let slice = &series[i - window..=i + window];
        if slice.iter().any(|v| v.is_nan()) {
            return None;
        }
        let v = series[i];
        if slice.iter().all(|&x| v <= x) {
            Some(SwingPoint {
                index: i,
                confirmed_at: i + window,
                kind: SwingKind::Low,
            })
        } else if slice.iter().all(|&x| v >= x) {
            Some(SwingPoint {
                index: i,
                confirmed_at: i + window,
                kind: SwingKind::High,
            })
        } else {
            None
        }
    })
}

/// Divergence flags aligned to the series: +1 bullish, -1 bearish, 0 none.
///
/// Bullish: consecutive price swing lows make a lower low while the paired
/// indicator swing lows make a higher low. Bearish is the mirror over highs.
/// A price extremum pairs with the nearest indicator extremum of the same
/// kind within `pair_span` bars whose own confirmation bar is at or before
/// the price swing's; unpaired extrema produce no flag. The confirmation
/// filter keeps the flag at bar i a function of bars [0..i] only.
pub fn detect_divergence(
    price: &[f64],
    indicator: &[f64],
    window: usize,
    pair_span: usize,
) -> Vec<i8> {
    let n = price.len();
    let mut flags = vec![0i8; n];
    if window == 0 || n == 0 {
        return flags;
    }

    let price_swings: Vec<SwingPoint> = swing_points(price, window).collect();
    let ind_swings: Vec<SwingPoint> = swing_points(indicator, window).collect();

    let pair = |p: &SwingPoint| -> Option<usize> {
        ind_swings
            .iter()
            .filter(|s| s.kind == p.kind && s.confirmed_at <= p.confirmed_at)
            .map(|s| s.index)
            .filter(|&q| q.abs_diff(p.index) <= pair_span)
            .min_by_key(|&q| q.abs_diff(p.index))
    };

    for kind in [SwingKind::Low, SwingKind::High] {
        let swings: Vec<&SwingPoint> =
            price_swings.iter().filter(|s| s.kind == kind).collect();
        for w in swings.windows(2) {
            let (prev, curr) = (w[0], w[1]);
            let (Some(ind_prev), Some(ind_curr)) = (pair(prev), pair(curr)) else {
                continue;
            };
            match kind {
                SwingKind::Low => {
                    if price[curr.index] < price[prev.index]
                        && indicator[ind_curr] > indicator[ind_prev]
                    {
                        flags[curr.confirmed_at] = 1;
                    }
                }
                SwingKind::High => {
                    if price[curr.index] > price[prev.index]
                        && indicator[ind_curr] < indicator[ind_prev]
                    {
                        flags[curr.confirmed_at] = -1;
                    }
                }
            }
        }
    }

    flags
}
