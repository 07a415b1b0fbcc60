//! Position — an open trade owned by the execution simulator.

use super::direction::Direction;
use super::signal::FactorSet;
use serde::{Deserialize, Serialize};

/// An open position. Owned exclusively by the simulator for its lifetime and
/// closed exactly once (stop, take, or forced session end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub direction: Direction,
    pub quantity: f64,
    pub entry_price: f64,
    pub stop_price: f64,
    pub take_price: f64,
    pub entry_bar: usize,
    /// Confluence factors active at entry, carried into the trade record.
    pub factors: FactorSet,
}

impl Position {
    /// Signed PnL if the position were closed at `price`.
    pub fn pnl_at(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.quantity * self.direction.sign()
    }
}
