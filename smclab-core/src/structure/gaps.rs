//! Fair value gap (imbalance) detection.
//!
//! 3-bar pattern: the first and third bar's ranges do not overlap, and the
//! middle (displacement) bar's body exceeds `fvg_min_body_atr` × ATR.
//!
//! Bullish: high[i-2] < low[i], zone spans [high[i-2], low[i]].
//! Bearish: low[i-2] > high[i], zone spans [high[i], low[i-2]].

use super::zone::{Zone, ZoneKind};
use crate::domain::{Bar, Direction};

/// Scan the series for fair value gaps. Zones come back with invalidation
/// already resolved against later closes.
pub fn detect_gaps(bars: &[Bar], atr: &[f64], min_body_atr: f64) -> Vec<Zone> {
    let mut zones = Vec::new();

    for i in 2..bars.len() {
        let mid = &bars[i - 1];
        let vol = atr[i - 1];
        if vol.is_nan() || mid.body() < vol * min_body_atr {
            continue;
        }

        if bars[i - 2].high < bars[i].low {
            zones.push(Zone {
                kind: ZoneKind::Gap,
                direction: Direction::Long,
                low: bars[i - 2].high,
                high: bars[i].low,
                origin: i,
                detected_at: i,
                invalidated_at: None,
            });
        }
        if bars[i - 2].low > bars[i].high {
            zones.push(Zone {
                kind: ZoneKind::Gap,
                direction: Direction::Short,
                low: bars[i].high,
                high: bars[i - 2].low,
                origin: i,
                detected_at: i,
                invalidated_at: None,
            });
        }
    }

    for zone in &mut zones {
        zone.resolve_invalidation(bars);
    }
    zones
}
