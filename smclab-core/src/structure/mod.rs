//! Structure detector — imbalance gaps, order blocks, liquidity sweeps.
//!
//! All three detectors scan the whole series once up front; per-bar queries
//! then answer "does an active zone favor this direction here". A zone is
//! never visible before its detection bar, so walk-forward replays see
//! exactly what a live scan at that bar would have seen.

pub mod blocks;
pub mod gaps;
pub mod sweeps;
pub mod zone;

pub use blocks::detect_order_blocks;
pub use gaps::detect_gaps;
pub use sweeps::detect_sweeps;
pub use zone::{Zone, ZoneKind};

use crate::config::StrategyParams;
use crate::domain::{Bar, Direction};

/// All structural zones found in one scan of a bar series.
#[derive(Debug, Clone)]
pub struct StructureScan {
    pub gaps: Vec<Zone>,
    pub blocks: Vec<Zone>,
    pub sweeps: Vec<Zone>,
    fvg_lookback: usize,
    ob_lookback: usize,
    sweep_lookback: usize,
}

impl StructureScan {
    pub fn scan(bars: &[Bar], atr: &[f64], params: &StrategyParams) -> Self {
        Self {
            gaps: detect_gaps(bars, atr, params.fvg_min_body_atr),
            blocks: detect_order_blocks(bars, params.ob_lookback),
            sweeps: detect_sweeps(bars, params.sweep_lookback),
            fvg_lookback: params.fvg_lookback,
            ob_lookback: params.ob_lookback,
            sweep_lookback: params.sweep_lookback,
        }
    }

    /// Is `close` inside an active gap zone favoring `direction` at bar `i`?
    pub fn in_gap_zone(&self, i: usize, close: f64, direction: Direction) -> bool {
        self.gaps
            .iter()
            .any(|z| z.direction == direction && z.is_active(i, self.fvg_lookback) && z.contains(close))
    }

    /// Is `close` inside an active order block favoring `direction` at bar `i`?
    pub fn in_order_block(&self, i: usize, close: f64, direction: Direction) -> bool {
        self.blocks
            .iter()
            .any(|z| z.direction == direction && z.is_active(i, self.ob_lookback) && z.contains(close))
    }

    /// Did a sweep favoring `direction` occur within the sweep lookback of
    /// bar `i`? Sweeps are recency-scoped, not containment-scoped.
    pub fn recent_sweep(&self, i: usize, direction: Direction) -> bool {
        self.sweeps
            .iter()
            .any(|z| z.direction == direction && z.origin <= i && i - z.origin <= self.sweep_lookback)
    }

    /// All active zones (any kind) whose bounds contain `close` at bar `i`.
    pub fn zones_at(&self, i: usize, close: f64) -> Vec<&Zone> {
        let horizon = |z: &Zone| match z.kind {
            ZoneKind::Gap => self.fvg_lookback,
            ZoneKind::Block => self.ob_lookback,
            ZoneKind::Sweep => self.sweep_lookback,
        };
        self.gaps
            .iter()
            .chain(&self.blocks)
            .chain(&self.sweeps)
            .filter(|z| z.is_active(i, horizon(z)) && z.contains(close))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_ohlc_bars;

    fn scan_of(bars: &[Bar]) -> StructureScan {
        let params = StrategyParams {
            fvg_lookback: 10,
            ob_lookback: 4,
            sweep_lookback: 3,
            fvg_min_body_atr: 1.0,
            ..StrategyParams::daily()
        };
        let atr = vec![2.0; bars.len()];
        StructureScan::scan(bars, &atr, &params)
    }

    #[test]
    fn gap_zone_query_respects_direction_and_bounds() {
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 99.0, 100.5),
            (100.5, 101.5, 99.5, 100.0),
            (100.0, 101.0, 99.0, 100.2),
            (100.2, 106.0, 100.0, 105.8),
            (105.5, 107.0, 103.0, 106.0), // bullish gap [101, 103] at bar 4
            (106.0, 106.5, 101.5, 102.0), // close 102 back inside the gap
        ]);
        let scan = scan_of(&bars);
        assert!(scan.in_gap_zone(5, 102.0, Direction::Long));
        assert!(!scan.in_gap_zone(5, 102.0, Direction::Short));
        assert!(!scan.in_gap_zone(5, 105.0, Direction::Long)); // outside bounds
        assert!(!scan.in_gap_zone(3, 102.0, Direction::Long)); // before detection
    }

    #[test]
    fn sweep_recency_window() {
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 99.0, 100.5),
            (100.5, 101.5, 99.5, 100.0),
            (100.0, 101.0, 99.2, 100.8),
            (100.8, 101.0, 97.5, 100.2), // bullish sweep at bar 3
            (100.2, 101.0, 99.8, 100.5),
            (100.5, 101.0, 99.9, 100.4),
            (100.4, 101.0, 99.9, 100.6),
            (100.6, 101.0, 99.9, 100.5),
        ]);
        let scan = scan_of(&bars);
        assert!(scan.recent_sweep(3, Direction::Long));
        assert!(scan.recent_sweep(6, Direction::Long));
        assert!(!scan.recent_sweep(7, Direction::Long)); // horizon elapsed
        assert!(!scan.recent_sweep(3, Direction::Short));
    }

    #[test]
    fn zones_at_returns_containing_zones_only() {
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 99.0, 100.5),
            (100.5, 101.5, 99.5, 100.0),
            (100.0, 101.0, 99.0, 100.2),
            (100.2, 106.0, 100.0, 105.8),
            (105.5, 107.0, 103.0, 106.0),
            (106.0, 106.5, 101.5, 102.0),
        ]);
        let scan = scan_of(&bars);
        let zones = scan.zones_at(5, 102.0);
        assert!(zones.iter().any(|z| z.kind == ZoneKind::Gap));
        assert!(scan.zones_at(5, 110.0).is_empty());
    }
}
