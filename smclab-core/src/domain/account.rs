//! AccountState — equity, peak, day tracking, and halt status.

use serde::{Deserialize, Serialize};

/// Why new entries are currently vetoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// Day's running PnL breached the daily loss limit. Clears at the next
    /// day boundary.
    DailyLossLimit,
    /// Drawdown from peak equity breached the lifetime limit. Never clears
    /// within a run.
    MaxDrawdown,
}

/// Account ledger state. Mutated only by the simulator and risk manager as
/// trades open/close and day boundaries cross; equity changes only by
/// explicit trade PnL application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub equity: f64,
    pub peak_equity: f64,
    pub day_start_equity: f64,
    pub daily_pnl: f64,
    pub open_positions: usize,
    pub halt: Option<HaltReason>,
}

impl AccountState {
    pub fn new(initial_equity: f64) -> Self {
        Self {
            equity: initial_equity,
            peak_equity: initial_equity,
            day_start_equity: initial_equity,
            daily_pnl: 0.0,
            open_positions: 0,
            halt: None,
        }
    }

    /// Apply a realized trade PnL. Updates equity, peak, and the day tracker.
    pub fn apply_trade_pnl(&mut self, pnl: f64) {
        self.equity += pnl;
        self.daily_pnl += pnl;
        if self.equity > self.peak_equity {
            self.peak_equity = self.equity;
        }
    }

    /// Cross a day boundary: rebase the day tracker and clear a daily-loss
    /// halt. A drawdown halt is permanent.
    pub fn reset_day(&mut self) {
        self.day_start_equity = self.equity;
        self.daily_pnl = 0.0;
        if self.halt == Some(HaltReason::DailyLossLimit) {
            self.halt = None;
        }
    }

    /// Drawdown from peak as a non-positive fraction.
    pub fn drawdown(&self) -> f64 {
        if self.peak_equity <= 0.0 {
            return 0.0;
        }
        (self.equity - self.peak_equity) / self.peak_equity
    }

    /// Day's running PnL as a fraction of day-start equity.
    pub fn daily_pnl_fraction(&self) -> f64 {
        if self.day_start_equity <= 0.0 {
            return 0.0;
        }
        self.daily_pnl / self.day_start_equity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_moves_equity_and_peak() {
        let mut account = AccountState::new(1000.0);
        account.apply_trade_pnl(100.0);
        assert_eq!(account.equity, 1100.0);
        assert_eq!(account.peak_equity, 1100.0);
        account.apply_trade_pnl(-50.0);
        assert_eq!(account.equity, 1050.0);
        assert_eq!(account.peak_equity, 1100.0); // peak never rolls back
    }

    #[test]
    fn drawdown_fraction() {
        let mut account = AccountState::new(1000.0);
        account.apply_trade_pnl(-300.0);
        assert!((account.drawdown() - (-0.3)).abs() < 1e-12);
    }

    #[test]
    fn day_reset_clears_daily_halt_only() {
        let mut account = AccountState::new(1000.0);
        account.apply_trade_pnl(-25.0);
        account.halt = Some(HaltReason::DailyLossLimit);
        account.reset_day();
        assert_eq!(account.daily_pnl, 0.0);
        assert_eq!(account.day_start_equity, 975.0);
        assert_eq!(account.halt, None);

        account.halt = Some(HaltReason::MaxDrawdown);
        account.reset_day();
        assert_eq!(account.halt, Some(HaltReason::MaxDrawdown));
    }
}
