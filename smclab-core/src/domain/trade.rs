//! TradeRecord — a completed round-trip trade, the ledger unit.

use super::direction::Direction;
use super::signal::FactorSet;
use serde::{Deserialize, Serialize};

/// How a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitKind {
    Stop,
    Take,
    /// Force-closed at the final bar of the replay.
    SessionEnd,
}

/// Immutable summary of one closed trade.
///
/// Appended to the ledger and never mutated. The ledger is the sole hand-off
/// artifact to offline learning and reporting tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub direction: Direction,
    pub quantity: f64,

    pub entry_bar: usize,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_price: f64,

    pub stop_price: f64,
    pub take_price: f64,

    pub pnl: f64,
    pub exit_kind: ExitKind,

    /// Confluence factors active at entry.
    pub factors: FactorSet,
}

impl TradeRecord {
    pub fn confluence(&self) -> usize {
        self.factors.len()
    }

    /// Win/loss label consumed by the offline learning boundary.
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar - self.entry_bar
    }
}
