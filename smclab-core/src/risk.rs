//! Risk manager — sizing and portfolio-level circuit breakers.
//!
//! Turns a signal into a bounded order request, or an explicit veto:
//! 1. Fixed-fractional sizing: a stop hit loses at most `risk_per_trade` of
//!    equity.
//! 2. Kelly-Lite cap once enough trade history exists: the smaller of the
//!    fixed fraction and the scaled Kelly fraction. Dampens, never amplifies.
//! 3. Guards, in order: max concurrent positions, daily loss breaker,
//!    lifetime drawdown breaker.

use crate::config::StrategyParams;
use crate::domain::{AccountState, Direction, FactorSet, HaltReason, Signal};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Validated, risk-adjusted order ready for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub direction: Direction,
    pub quantity: f64,
    /// Reference entry (signal-bar close). The simulator re-anchors stop and
    /// take from the realized fill.
    pub entry_price: f64,
    pub stop_price: f64,
    pub take_price: f64,
    /// ATR at the signal bar, for re-anchoring exits at fill time.
    pub atr: f64,
    /// Confluence factors from the originating signal, carried into the
    /// position and the trade ledger.
    pub factors: FactorSet,
}

/// Why a signal was not turned into an order. Not an error: the run carries
/// on, existing positions close normally.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Veto {
    #[error("max concurrent positions reached")]
    MaxPositionsReached,

    #[error("daily loss limit breached, halted until next day")]
    DailyLossHalt,

    #[error("max drawdown breached, halted for the rest of the run")]
    DrawdownHalt,

    #[error("stop distance is zero")]
    ZeroStopDistance,

    #[error("sized order below minimum quantity")]
    DustSize,
}

/// Stateful risk gate between the confluence engine and the simulator.
/// Carries the per-trade PnL history that feeds Kelly-Lite sizing.
#[derive(Debug, Clone)]
pub struct RiskManager {
    params: StrategyParams,
    trade_pnls: Vec<f64>,
}

impl RiskManager {
    pub fn new(params: StrategyParams) -> Self {
        Self {
            params,
            trade_pnls: Vec::new(),
        }
    }

    /// Record a completed trade's realized PnL.
    pub fn record_trade(&mut self, pnl: f64) {
        self.trade_pnls.push(pnl);
    }

    pub fn completed_trades(&self) -> usize {
        self.trade_pnls.len()
    }

    /// Run all guards and size the position. On a halt guard this also sets
    /// `account.halt` so the replay can annotate the terminal state.
    pub fn evaluate(
        &self,
        signal: &Signal,
        account: &mut AccountState,
    ) -> Result<OrderRequest, Veto> {
        if account.halt == Some(HaltReason::MaxDrawdown) {
            return Err(Veto::DrawdownHalt);
        }

        if account.open_positions >= self.params.max_open_positions {
            debug!(open = account.open_positions, "veto: max positions");
            return Err(Veto::MaxPositionsReached);
        }

        // Lifetime breaker first: when both limits are breached the account
        // must record the permanent halt, not the one that clears tomorrow.
        if account.drawdown() <= -self.params.max_drawdown {
            warn!(
                equity = account.equity,
                peak = account.peak_equity,
                "max drawdown breached, halting entries for the run"
            );
            account.halt = Some(HaltReason::MaxDrawdown);
            return Err(Veto::DrawdownHalt);
        }

        if account.daily_pnl_fraction() <= -self.params.daily_loss_limit {
            warn!(
                daily_pnl = account.daily_pnl,
                "daily loss limit hit, no new entries today"
            );
            account.halt = Some(HaltReason::DailyLossLimit);
            return Err(Veto::DailyLossHalt);
        }

        let entry = signal.close;
        let sign = signal.direction.sign();
        let stop = entry - sign * signal.atr * self.params.atr_stop_mult;
        let take = entry + sign * signal.atr * self.params.atr_take_mult;

        let distance = (entry - stop).abs();
        if distance == 0.0 {
            return Err(Veto::ZeroStopDistance);
        }

        let mut risk_fraction = self.params.risk_per_trade;
        if self.params.use_kelly {
            if let Some(kelly) = self.kelly_fraction() {
                risk_fraction = risk_fraction.min(kelly);
            }
        }

        let raw = account.equity * risk_fraction / distance;
        // Floor, not round: rounding up could push the implied stop loss past
        // the risk budget.
        let quantity = (raw * 1e4).floor() / 1e4;
        if quantity < self.params.min_order_quantity {
            debug!(quantity, "veto: dust size");
            return Err(Veto::DustSize);
        }

        debug!(
            direction = %signal.direction,
            quantity,
            entry,
            stop,
            take,
            "order approved"
        );
        Ok(OrderRequest {
            direction: signal.direction,
            quantity,
            entry_price: entry,
            stop_price: stop,
            take_price: take,
            atr: signal.atr,
            factors: signal.factors,
        })
    }

    /// Kelly-Lite risk fraction from trade history.
    ///
    /// f* = (p*W - (1-p)) / W with p the win rate and W the avg win/loss
    /// ratio, scaled by `kelly_fraction`. None while history is short, when
    /// one side is empty, or when the edge is non-positive.
    pub fn kelly_fraction(&self) -> Option<f64> {
        if self.trade_pnls.len() < self.params.kelly_min_trades {
            return None;
        }
        let wins: Vec<f64> = self.trade_pnls.iter().copied().filter(|p| *p > 0.0).collect();
        let losses: Vec<f64> = self.trade_pnls.iter().copied().filter(|p| *p <= 0.0).collect();
        if wins.is_empty() || losses.is_empty() {
            return None;
        }

        let p = wins.len() as f64 / self.trade_pnls.len() as f64;
        let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
        let avg_loss = (losses.iter().sum::<f64>() / losses.len() as f64).abs();
        if avg_loss == 0.0 {
            return None;
        }

        let w = avg_win / avg_loss;
        let full_kelly = (p * w - (1.0 - p)) / w;
        if full_kelly <= 0.0 {
            return None;
        }
        Some(full_kelly * self.params.kelly_fraction)
    }
}
