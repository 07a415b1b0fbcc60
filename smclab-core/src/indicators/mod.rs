//! Indicator engine — trend/momentum series and divergence flags.
//!
//! Everything is precomputed once per run into an `IndicatorFrame` aligned
//! 1:1 with the bar series. Values before an indicator's seed window are NaN
//! and must be treated downstream as "factor absent", never as a failing
//! condition.

pub mod atr;
pub mod divergence;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::{atr, true_range, wilder_smooth};
pub use divergence::{detect_divergence, swing_points, SwingKind, SwingPoint};
pub use ema::ema_of_series;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi_of_closes;

use crate::config::StrategyParams;
use crate::domain::Bar;

/// Per-bar derived values, recomputed deterministically from a bar series.
///
/// Each series has the same length as the input bars; no value at index i
/// depends on bars after i.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd_line: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub atr: Vec<f64>,
    /// +1 bullish, -1 bearish, 0 none; flagged at the confirmation bar.
    pub rsi_divergence: Vec<i8>,
    pub macd_divergence: Vec<i8>,
}

impl IndicatorFrame {
    /// Compute the full frame for a bar series.
    pub fn compute(bars: &[Bar], params: &StrategyParams) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let ema_fast = ema_of_series(&closes, params.ema_fast);
        let ema_slow = ema_of_series(&closes, params.ema_slow);
        let rsi = rsi_of_closes(&closes, params.rsi_period);
        let macd_series = macd(
            &closes,
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        );
        let atr_series = atr(bars, params.atr_period);

        let rsi_divergence = detect_divergence(
            &closes,
            &rsi,
            params.swing_window,
            params.divergence_pair_span,
        );
        let macd_divergence = detect_divergence(
            &closes,
            &macd_series.line,
            params.swing_window,
            params.divergence_pair_span,
        );

        Self {
            ema_fast,
            ema_slow,
            rsi,
            macd_line: macd_series.line,
            macd_signal: macd_series.signal,
            macd_hist: macd_series.histogram,
            atr: atr_series,
            rsi_divergence,
            macd_divergence,
        }
    }

    pub fn len(&self) -> usize {
        self.atr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atr.is_empty()
    }

    /// True when every series the confluence gate needs is defined at `i`.
    pub fn is_ready(&self, i: usize) -> bool {
        !self.ema_slow[i].is_nan() && !self.rsi[i].is_nan() && !self.atr[i].is_nan()
    }
}
