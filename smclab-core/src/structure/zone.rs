//! Structural zones shared by the three detectors.

use crate::domain::{Bar, Direction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Fair value gap (3-bar imbalance).
    Gap,
    /// Order block (last opposing bar before a structure break).
    Block,
    /// Liquidity sweep (stop-hunt reversal). Degenerate bounds at the swept
    /// extreme; favors its direction by recency rather than containment.
    Sweep,
}

/// A structural region. Append-only per scan; multiple zones of the same kind
/// may be simultaneously active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub direction: Direction,
    pub low: f64,
    pub high: f64,
    /// Bar that anchors the zone (the pattern bar).
    pub origin: usize,
    /// First bar at which the zone is known. For order blocks this is the
    /// structure-break bar, later than `origin`; a walk-forward replay must
    /// not see the zone before it.
    pub detected_at: usize,
    /// Bar whose close fully traversed the zone, if any. The zone is dead
    /// from that bar onward.
    pub invalidated_at: Option<usize>,
}

impl Zone {
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }

    /// Active at bar `i` within a `lookback` horizon measured from origin.
    pub fn is_active(&self, i: usize, lookback: usize) -> bool {
        if i < self.detected_at || i - self.origin > lookback {
            return false;
        }
        match self.invalidated_at {
            Some(dead) => i < dead,
            None => true,
        }
    }

    /// Find the first close after `detected_at` that fully traverses the
    /// zone: below the low for a bullish zone, above the high for a bearish
    /// one. Called once at scan time.
    pub fn resolve_invalidation(&mut self, bars: &[Bar]) {
        for (i, bar) in bars.iter().enumerate().skip(self.detected_at + 1) {
            let traversed = match self.direction {
                Direction::Long => bar.close < self.low,
                Direction::Short => bar.close > self.high,
            };
            if traversed {
                self.invalidated_at = Some(i);
                return;
            }
        }
    }
}
