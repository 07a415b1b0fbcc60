//! Confluence engine — per-bar signal scoring.
//!
//! The only persistent state is the cooldown counter. Each bar:
//! 1. Mandatory trend gate: fast EMA above slow EMA gates long, below gates
//!    short. No gate, no signal, whatever the other factors say.
//! 2. Count confirming factors for the gated direction.
//! 3. Fire iff the gate passed, confirming count >= `min_confluence`, and the
//!    cooldown is zero.
//! 4. On fire, reset the cooldown; it decrements once per bar regardless.
//!
//! Undefined indicator values (warmup NaNs) are "factor absent", never a
//! failing condition.

use crate::config::StrategyParams;
use crate::domain::{Bar, Direction, Factor, FactorSet, Signal};
use crate::indicators::IndicatorFrame;
use crate::structure::StructureScan;
use tracing::debug;

/// Stateful per-run scorer. One instance per replay; never shared across runs.
#[derive(Debug, Clone)]
pub struct ConfluenceEngine {
    params: StrategyParams,
    cooldown: usize,
}

impl ConfluenceEngine {
    pub fn new(params: StrategyParams) -> Self {
        Self { params, cooldown: 0 }
    }

    /// Bars remaining before another signal may fire.
    pub fn cooldown_remaining(&self) -> usize {
        self.cooldown
    }

    /// Evaluate bar `i`. Must be called once per bar, in order, so the
    /// cooldown counter ticks correctly.
    pub fn on_bar(
        &mut self,
        bars: &[Bar],
        frame: &IndicatorFrame,
        scan: &StructureScan,
        i: usize,
    ) -> Option<Signal> {
        let ticking = self.cooldown > 0;
        if ticking {
            self.cooldown -= 1;
        }

        if !frame.is_ready(i) {
            return None;
        }

        let direction = trend_gate(frame, i)?;
        let factors = score_direction(&self.params, bars, frame, scan, i, direction);

        // The gate itself does not count toward the confirming minimum.
        let confirming = factors.len() - 1;
        if confirming < self.params.min_confluence || ticking {
            return None;
        }

        self.cooldown = self.params.cooldown_bars;
        let signal = Signal {
            bar: i,
            direction,
            factors,
            atr: frame.atr[i],
            close: bars[i].close,
        };
        debug!(
            bar = i,
            direction = %direction,
            confluence = confirming,
            factors = %factors.join(),
            "signal fired"
        );
        Some(signal)
    }
}

/// Mandatory trend gate. Directional by construction: fast strictly above
/// slow gates long, strictly below gates short, equal gates nothing (so the
/// bullish-priority tie-break is never exercised).
fn trend_gate(frame: &IndicatorFrame, i: usize) -> Option<Direction> {
    let fast = frame.ema_fast[i];
    let slow = frame.ema_slow[i];
    if fast.is_nan() || slow.is_nan() {
        None
    } else if fast > slow {
        Some(Direction::Long)
    } else if fast < slow {
        Some(Direction::Short)
    } else {
        None
    }
}

/// Score every factor for `direction` at bar `i`. Always includes
/// `TrendAlign` (the caller only gets here through the gate).
fn score_direction(
    params: &StrategyParams,
    bars: &[Bar],
    frame: &IndicatorFrame,
    scan: &StructureScan,
    i: usize,
    direction: Direction,
) -> FactorSet {
    let mut factors = FactorSet::new();
    factors.insert(Factor::TrendAlign);

    let close = bars[i].close;

    // Exact crossover bar (bonus on top of the standing trend).
    if i > 0 {
        let fast_prev = frame.ema_fast[i - 1];
        let slow_prev = frame.ema_slow[i - 1];
        if !fast_prev.is_nan() && !slow_prev.is_nan() {
            let crossed = match direction {
                Direction::Long => fast_prev <= slow_prev,
                Direction::Short => fast_prev >= slow_prev,
            };
            if crossed {
                factors.insert(Factor::EmaCross);
            }
        }
    }

    // Oscillator not yet in its extreme band for the direction.
    let rsi = frame.rsi[i];
    if !rsi.is_nan() {
        let room = match direction {
            Direction::Long => rsi < params.rsi_overbought,
            Direction::Short => rsi > params.rsi_oversold,
        };
        if room {
            factors.insert(Factor::RsiFilter);
        }
    }

    // Histogram expanding in the direction, or flipping across zero.
    if i > 0 {
        let hist = frame.macd_hist[i];
        let hist_prev = frame.macd_hist[i - 1];
        if !hist.is_nan() && !hist_prev.is_nan() {
            let confirm = match direction {
                Direction::Long => {
                    (hist > hist_prev && hist > 0.0) || (hist_prev < 0.0 && hist >= 0.0)
                }
                Direction::Short => {
                    (hist < hist_prev && hist < 0.0) || (hist_prev > 0.0 && hist <= 0.0)
                }
            };
            if confirm {
                factors.insert(Factor::MacdConfirm);
            }
        }
    }

    let wanted_flag = match direction {
        Direction::Long => 1,
        Direction::Short => -1,
    };
    if frame.rsi_divergence[i] == wanted_flag {
        factors.insert(Factor::RsiDivergence);
    }
    if frame.macd_divergence[i] == wanted_flag {
        factors.insert(Factor::MacdDivergence);
    }

    if scan.in_gap_zone(i, close, direction) {
        factors.insert(Factor::GapZone);
    }
    if scan.in_order_block(i, close, direction) {
        factors.insert(Factor::OrderBlock);
    }
    if scan.recent_sweep(i, direction) {
        factors.insert(Factor::LiquiditySweep);
    }

    factors
}

/// Run the engine over a whole enriched series and collect every fired
/// signal. Used by the replay and by the live-boundary latest-signal query.
pub fn scan_signals(
    bars: &[Bar],
    frame: &IndicatorFrame,
    scan: &StructureScan,
    params: &StrategyParams,
) -> Vec<Signal> {
    let mut engine = ConfluenceEngine::new(params.clone());
    (0..bars.len())
        .filter_map(|i| engine.on_bar(bars, frame, scan, i))
        .collect()
}

/// Most recent fired signal over the series, if any. The live boundary calls
/// this once per decision cycle on a series ending at the last closed bar.
pub fn latest_signal(bars: &[Bar], params: &StrategyParams) -> Option<Signal> {
    let frame = IndicatorFrame::compute(bars, params);
    let scan = StructureScan::scan(bars, &frame.atr, params);
    scan_signals(bars, &frame, &scan, params).pop()
}
