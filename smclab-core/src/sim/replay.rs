//! Walk-forward replay — the backtest event loop.
//!
//! Per bar, in order:
//! 1. Day boundary: reset the day tracker when the calendar date changes.
//! 2. Fill the pending order from the previous bar's signal at this bar's
//!    open (friction per the fill model), re-anchoring stop and take from the
//!    realized fill.
//! 3. Exit checks on every open position: stop touch beats take touch within
//!    the same bar. Exits realize PnL into the account and the ledger.
//! 4. Score the bar; a fired signal runs the risk gauntlet and, if approved,
//!    becomes the pending order for the next bar. Signals at the final bar
//!    have no next open and are dropped.
//! 5. Mark equity to the bar close, open positions included.
//!
//! The final bar force-closes whatever is still open at its close.

use crate::config::{ParamError, StrategyParams};
use crate::confluence::ConfluenceEngine;
use crate::domain::{AccountState, Bar, Direction, ExitKind, Position, TradeRecord};
use crate::indicators::IndicatorFrame;
use crate::risk::{OrderRequest, RiskManager};
use crate::series::{validate_series, DataError};
use crate::sim::fill::FillModel;
use crate::structure::StructureScan;
use chrono::Datelike;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Params(#[from] ParamError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("initial equity must be positive, got {0}")]
    NonPositiveEquity(f64),
}

/// Everything a finished replay produced.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub trades: Vec<TradeRecord>,
    /// Mark-to-market equity after each bar, same length as the input series.
    pub equity_curve: Vec<f64>,
    pub account: AccountState,
}

impl BacktestResult {
    pub fn final_equity(&self) -> f64 {
        self.account.equity
    }
}

/// Run the full pipeline over a bar series.
pub fn run_backtest(
    bars: &[Bar],
    params: &StrategyParams,
    initial_equity: f64,
) -> Result<BacktestResult, BacktestError> {
    params.validate()?;
    validate_series(bars, params.warmup_bars())?;
    if initial_equity <= 0.0 {
        return Err(BacktestError::NonPositiveEquity(initial_equity));
    }

    let frame = IndicatorFrame::compute(bars, params);
    let scan = StructureScan::scan(bars, &frame.atr, params);
    let mut engine = ConfluenceEngine::new(params.clone());
    let mut risk = RiskManager::new(params.clone());
    let mut fill = FillModel::new(params);

    let mut account = AccountState::new(initial_equity);
    let mut open: Vec<Position> = Vec::new();
    let mut pending: Option<OrderRequest> = None;
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut equity_curve: Vec<f64> = Vec::with_capacity(bars.len());

    let n = bars.len();
    for i in 0..n {
        if i > 0 && day_of(&bars[i]) != day_of(&bars[i - 1]) {
            account.reset_day();
        }

        if let Some(order) = pending.take() {
            let entry = fill.entry_fill(&bars[i], order.direction, order.atr);
            let sign = order.direction.sign();
            let position = Position {
                direction: order.direction,
                quantity: order.quantity,
                entry_price: entry,
                stop_price: entry - sign * order.atr * params.atr_stop_mult,
                take_price: entry + sign * order.atr * params.atr_take_mult,
                entry_bar: i,
                factors: order.factors,
            };
            debug!(bar = i, direction = %position.direction, entry, "position opened");
            open.push(position);
            account.open_positions = open.len();
        }

        let mut k = 0;
        while k < open.len() {
            match exit_touch(&open[k], &bars[i]) {
                Some((kind, level)) => {
                    let position = open.swap_remove(k);
                    let exit = fill.exit_fill(level, position.direction);
                    close_position(position, kind, exit, i, &mut account, &mut risk, &mut trades);
                }
                None => k += 1,
            }
        }
        account.open_positions = open.len();

        if let Some(signal) = engine.on_bar(bars, &frame, &scan, i) {
            if i + 1 < n {
                match risk.evaluate(&signal, &mut account) {
                    Ok(order) => pending = Some(order),
                    Err(veto) => debug!(bar = i, %veto, "signal vetoed"),
                }
            }
        }

        if i == n - 1 {
            for position in open.drain(..) {
                let exit = fill.exit_fill(bars[i].close, position.direction);
                close_position(
                    position,
                    ExitKind::SessionEnd,
                    exit,
                    i,
                    &mut account,
                    &mut risk,
                    &mut trades,
                );
            }
            account.open_positions = 0;
        }

        let unrealized: f64 = open.iter().map(|p| p.pnl_at(bars[i].close)).sum();
        equity_curve.push(account.equity + unrealized);
    }

    info!(
        trades = trades.len(),
        final_equity = account.equity,
        halt = ?account.halt,
        "replay finished"
    );
    Ok(BacktestResult {
        trades,
        equity_curve,
        account,
    })
}

fn day_of(bar: &Bar) -> (i32, u32) {
    (bar.timestamp.year(), bar.timestamp.ordinal())
}

/// Which exit level, if any, bar `i` touches. Stop wins a same-bar tie.
fn exit_touch(position: &Position, bar: &Bar) -> Option<(ExitKind, f64)> {
    match position.direction {
        Direction::Long => {
            if bar.low <= position.stop_price {
                Some((ExitKind::Stop, position.stop_price))
            } else if bar.high >= position.take_price {
                Some((ExitKind::Take, position.take_price))
            } else {
                None
            }
        }
        Direction::Short => {
            if bar.high >= position.stop_price {
                Some((ExitKind::Stop, position.stop_price))
            } else if bar.low <= position.take_price {
                Some((ExitKind::Take, position.take_price))
            } else {
                None
            }
        }
    }
}

fn close_position(
    position: Position,
    kind: ExitKind,
    exit_price: f64,
    bar: usize,
    account: &mut AccountState,
    risk: &mut RiskManager,
    trades: &mut Vec<TradeRecord>,
) {
    let pnl = position.pnl_at(exit_price);
    account.apply_trade_pnl(pnl);
    risk.record_trade(pnl);
    debug!(bar, ?kind, pnl, "position closed");
    trades.push(TradeRecord {
        direction: position.direction,
        quantity: position.quantity,
        entry_bar: position.entry_bar,
        entry_price: position.entry_price,
        exit_bar: bar,
        exit_price,
        stop_price: position.stop_price,
        take_price: position.take_price,
        pnl,
        exit_kind: kind,
        factors: position.factors,
    });
}
