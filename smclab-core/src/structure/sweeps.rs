//! Liquidity sweep detection.
//!
//! Bullish sweep: a bar's low pierces the prior `lookback`-bar swing low and
//! the same bar (or the immediate next bar) closes back above it — stops were
//! run and price reversed. Bearish is the mirror over the swing high.

use super::zone::{Zone, ZoneKind};
use crate::domain::{Bar, Direction};

/// Scan the series for liquidity sweeps. Each sweep is a degenerate zone at
/// the swept extreme, anchored at the bar that closed back across it.
pub fn detect_sweeps(bars: &[Bar], lookback: usize) -> Vec<Zone> {
    let mut zones = Vec::new();
    let n = bars.len();

    for i in lookback..n {
        let window = &bars[i - lookback..i];
        let swing_low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let swing_high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);

        if bars[i].low < swing_low {
            // Same-bar reclaim, or reclaim on the very next bar.
            let reclaim = if bars[i].close > swing_low {
                Some(i)
            } else if i + 1 < n && bars[i + 1].close > swing_low {
                Some(i + 1)
            } else {
                None
            };
            if let Some(at) = reclaim {
                zones.push(sweep_zone(Direction::Long, swing_low, at));
            }
        }

        if bars[i].high > swing_high {
            let reclaim = if bars[i].close < swing_high {
                Some(i)
            } else if i + 1 < n && bars[i + 1].close < swing_high {
                Some(i + 1)
            } else {
                None
            };
            if let Some(at) = reclaim {
                zones.push(sweep_zone(Direction::Short, swing_high, at));
            }
        }
    }

    zones.dedup_by(|a, b| a.origin == b.origin && a.direction == b.direction);
    zones
}

fn sweep_zone(direction: Direction, level: f64, at: usize) -> Zone {
    Zone {
        kind: ZoneKind::Sweep,
        direction,
        low: level,
        high: level,
        origin: at,
        detected_at: at,
        invalidated_at: None,
    }
}
