//! Strategy parameters: one immutable value passed into every component.
//!
//! No process-wide mutable config. Each backtest run owns its own
//! `StrategyParams`, which makes parallel runs with differing parameters
//! trivially safe. Presets capture the per-timeframe tuning (longer structure
//! windows for higher-frequency bars).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How entry fills are modeled by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Fill at next bar open plus a seeded random jitter, with dynamic
    /// slippage and spread. Reproducible for a fixed seed.
    Randomized,
    /// Fill exactly at next bar open with only the spread applied. Used as a
    /// regression baseline.
    Deterministic,
}

/// Complete parameter set for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    // ── Trend ──
    pub ema_fast: usize,
    pub ema_slow: usize,

    // ── Momentum ──
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,

    // ── Convergence-divergence ──
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    // ── Volatility ──
    pub atr_period: usize,

    // ── Divergence detection ──
    /// Symmetric half-window for swing extremum detection (±N bars).
    pub swing_window: usize,
    /// Max bar distance between a price extremum and the indicator extremum
    /// it pairs with.
    pub divergence_pair_span: usize,

    // ── Structure detection ──
    /// Middle-bar body must exceed this multiple of ATR for a gap to count.
    pub fvg_min_body_atr: f64,
    pub fvg_lookback: usize,
    pub ob_lookback: usize,
    pub sweep_lookback: usize,

    // ── Confluence ──
    pub min_confluence: usize,
    pub cooldown_bars: usize,

    // ── Exits ──
    pub atr_stop_mult: f64,
    pub atr_take_mult: f64,

    // ── Risk ──
    pub risk_per_trade: f64,
    pub max_open_positions: usize,
    pub daily_loss_limit: f64,
    pub max_drawdown: f64,
    pub use_kelly: bool,
    /// Kelly-Lite scale: fraction of full Kelly applied once enough history
    /// exists. Dampens sizing, never amplifies it.
    pub kelly_fraction: f64,
    pub kelly_min_trades: usize,
    /// Orders below this quantity are vetoed as dust.
    pub min_order_quantity: f64,

    // ── Execution realism ──
    pub fill_mode: FillMode,
    pub fill_jitter_factor: f64,
    pub slippage_factor: f64,
    pub spread_fraction: f64,
    pub seed: u64,
}

impl StrategyParams {
    /// Daily-bar swing trading preset.
    pub fn daily() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
            swing_window: 5,
            divergence_pair_span: 3,
            fvg_min_body_atr: 1.0,
            fvg_lookback: 50,
            ob_lookback: 20,
            sweep_lookback: 20,
            min_confluence: 2,
            cooldown_bars: 5,
            atr_stop_mult: 1.5,
            atr_take_mult: 3.0,
            risk_per_trade: 0.02,
            max_open_positions: 5,
            daily_loss_limit: 0.02,
            max_drawdown: 0.30,
            use_kelly: true,
            kelly_fraction: 0.25,
            kelly_min_trades: 30,
            min_order_quantity: 0.01,
            fill_mode: FillMode::Randomized,
            fill_jitter_factor: 0.10,
            slippage_factor: 0.10,
            spread_fraction: 0.0002,
            seed: 0,
        }
    }

    /// 4-hour intraday preset: wider structure windows, tighter take, lower
    /// per-trade risk.
    pub fn four_hour() -> Self {
        Self {
            atr_take_mult: 2.5,
            fvg_min_body_atr: 0.8,
            fvg_lookback: 80,
            ob_lookback: 30,
            sweep_lookback: 30,
            cooldown_bars: 3,
            risk_per_trade: 0.015,
            ..Self::daily()
        }
    }

    /// Longest lookback any component needs before its output is defined.
    /// The replay requires at least this many bars of history.
    pub fn warmup_bars(&self) -> usize {
        let indicator = self
            .ema_slow
            .max(self.rsi_period + 1)
            .max(self.macd_slow + self.macd_signal)
            .max(self.atr_period + 1);
        let structure = self
            .fvg_lookback
            .max(self.ob_lookback)
            .max(self.sweep_lookback);
        indicator.max(structure).max(2 * self.swing_window + 1)
    }

    /// Reject contradictory or out-of-range configuration. Never clamps.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.ema_fast == 0 || self.ema_slow == 0 {
            return Err(ParamError::ZeroPeriod("ema"));
        }
        if self.ema_fast >= self.ema_slow {
            return Err(ParamError::FastNotBelowSlow {
                which: "ema",
                fast: self.ema_fast,
                slow: self.ema_slow,
            });
        }
        if self.rsi_period == 0 {
            return Err(ParamError::ZeroPeriod("rsi"));
        }
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return Err(ParamError::ZeroPeriod("macd"));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ParamError::FastNotBelowSlow {
                which: "macd",
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.atr_period == 0 {
            return Err(ParamError::ZeroPeriod("atr"));
        }
        if self.swing_window == 0 {
            return Err(ParamError::ZeroPeriod("swing_window"));
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(ParamError::RsiBands {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }
        if self.fvg_lookback == 0 || self.ob_lookback == 0 || self.sweep_lookback == 0 {
            return Err(ParamError::ZeroPeriod("structure lookback"));
        }
        if self.min_confluence < 1 {
            return Err(ParamError::MinConfluenceBelowOne);
        }
        if self.atr_stop_mult <= 0.0 || self.atr_take_mult <= 0.0 {
            return Err(ParamError::NonPositiveAtrMultiple {
                stop: self.atr_stop_mult,
                take: self.atr_take_mult,
            });
        }
        if !(self.risk_per_trade > 0.0 && self.risk_per_trade < 1.0) {
            return Err(ParamError::RiskFractionOutOfRange(self.risk_per_trade));
        }
        if self.max_open_positions == 0 {
            return Err(ParamError::ZeroMaxPositions);
        }
        if !(self.daily_loss_limit > 0.0 && self.daily_loss_limit <= 1.0) {
            return Err(ParamError::LossLimitOutOfRange {
                which: "daily_loss_limit",
                value: self.daily_loss_limit,
            });
        }
        if !(self.max_drawdown > 0.0 && self.max_drawdown <= 1.0) {
            return Err(ParamError::LossLimitOutOfRange {
                which: "max_drawdown",
                value: self.max_drawdown,
            });
        }
        if !(0.0..=1.0).contains(&self.kelly_fraction) {
            return Err(ParamError::KellyFractionOutOfRange(self.kelly_fraction));
        }
        if self.min_order_quantity < 0.0 {
            return Err(ParamError::NegativeFriction("min_order_quantity"));
        }
        if self.fill_jitter_factor < 0.0 {
            return Err(ParamError::NegativeFriction("fill_jitter_factor"));
        }
        if self.slippage_factor < 0.0 {
            return Err(ParamError::NegativeFriction("slippage_factor"));
        }
        if self.spread_fraction < 0.0 {
            return Err(ParamError::NegativeFriction("spread_fraction"));
        }
        Ok(())
    }
}

/// Contradictory or out-of-range configuration. Fatal at configuration time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{0} period must be >= 1")]
    ZeroPeriod(&'static str),

    #[error("{which} fast period ({fast}) must be below slow period ({slow})")]
    FastNotBelowSlow {
        which: &'static str,
        fast: usize,
        slow: usize,
    },

    #[error("RSI bands invalid: oversold={oversold}, overbought={overbought}")]
    RsiBands { oversold: f64, overbought: f64 },

    #[error("min_confluence must be >= 1")]
    MinConfluenceBelowOne,

    #[error("ATR multiples must be positive (stop={stop}, take={take})")]
    NonPositiveAtrMultiple { stop: f64, take: f64 },

    #[error("risk_per_trade must be in (0, 1), got {0}")]
    RiskFractionOutOfRange(f64),

    #[error("max_open_positions must be >= 1")]
    ZeroMaxPositions,

    #[error("{which} must be in (0, 1], got {value}")]
    LossLimitOutOfRange { which: &'static str, value: f64 },

    #[error("kelly_fraction must be in [0, 1], got {0}")]
    KellyFractionOutOfRange(f64),

    #[error("{0} must be non-negative")]
    NegativeFriction(&'static str),
}
