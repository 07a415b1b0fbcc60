//! Order block detection.
//!
//! A bullish order block is the last bearish bar before a close that breaks
//! above the prior `lookback`-bar high (structure break); bearish is the
//! mirror. The zone anchors at the opposing bar but is only known from the
//! break bar onward.

use super::zone::{Zone, ZoneKind};
use crate::domain::{Bar, Direction};

/// Scan the series for order blocks. Zones come back with invalidation
/// already resolved against later closes.
pub fn detect_order_blocks(bars: &[Bar], lookback: usize) -> Vec<Zone> {
    let mut zones: Vec<Zone> = Vec::new();

    let push_unique = |zones: &mut Vec<Zone>, zone: Zone| {
        // The same opposing bar can precede several break bars; keep only the
        // earliest detection.
        if !zones
            .iter()
            .any(|z| z.origin == zone.origin && z.direction == zone.direction)
        {
            zones.push(zone);
        }
    };

    for i in lookback..bars.len() {
        let window = &bars[i - lookback..i];
        let window_high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let window_low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        if bars[i].close > window_high {
            if let Some(j) = (i - lookback..i).rev().find(|&j| bars[j].is_bearish()) {
                push_unique(
                    &mut zones,
                    Zone {
                        kind: ZoneKind::Block,
                        direction: Direction::Long,
                        low: bars[j].low,
                        high: bars[j].high,
                        origin: j,
                        detected_at: i,
                        invalidated_at: None,
                    },
                );
            }
        }

        if bars[i].close < window_low {
            if let Some(j) = (i - lookback..i).rev().find(|&j| bars[j].is_bullish()) {
                push_unique(
                    &mut zones,
                    Zone {
                        kind: ZoneKind::Block,
                        direction: Direction::Short,
                        low: bars[j].low,
                        high: bars[j].high,
                        origin: j,
                        detected_at: i,
                        invalidated_at: None,
                    },
                );
            }
        }
    }

    for zone in &mut zones {
        zone.resolve_invalidation(bars);
    }
    zones
}
