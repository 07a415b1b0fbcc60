//! Signal — per-bar confluence decision, and the factor enumeration behind it.
//!
//! Factors are a fixed enumeration backed by a bitset rather than a bag of
//! strings, so scoring code can be exhaustively matched and tested.

use super::direction::Direction;
use serde::{Deserialize, Serialize};

/// One independent confirming factor counted by the confluence engine.
///
/// `TrendAlign` is the mandatory gate; the rest are optional confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    /// Fast EMA on the gated side of slow EMA (mandatory gate).
    TrendAlign,
    /// Exact EMA crossover bar (bonus on top of the gate).
    EmaCross,
    /// RSI not yet in its extreme band for the direction.
    RsiFilter,
    /// MACD histogram expanding in the direction (or zero-line flip).
    MacdConfirm,
    /// RSI divergence in the direction.
    RsiDivergence,
    /// MACD divergence in the direction.
    MacdDivergence,
    /// Close inside an active fair value gap zone favoring the direction.
    GapZone,
    /// Close inside an active order block zone favoring the direction.
    OrderBlock,
    /// Recent liquidity sweep favoring the direction.
    LiquiditySweep,
}

impl Factor {
    /// All factors, in scoring order.
    pub const ALL: [Factor; 9] = [
        Factor::TrendAlign,
        Factor::EmaCross,
        Factor::RsiFilter,
        Factor::MacdConfirm,
        Factor::RsiDivergence,
        Factor::MacdDivergence,
        Factor::GapZone,
        Factor::OrderBlock,
        Factor::LiquiditySweep,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn name(self) -> &'static str {
        match self {
            Factor::TrendAlign => "trend_align",
            Factor::EmaCross => "ema_cross",
            Factor::RsiFilter => "rsi_filter",
            Factor::MacdConfirm => "macd_confirm",
            Factor::RsiDivergence => "rsi_divergence",
            Factor::MacdDivergence => "macd_divergence",
            Factor::GapZone => "gap_zone",
            Factor::OrderBlock => "order_block",
            Factor::LiquiditySweep => "liquidity_sweep",
        }
    }
}

/// Bitset over `Factor`. Cheap to copy, exact equality, serializable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorSet(u16);

impl FactorSet {
    pub fn new() -> Self {
        FactorSet(0)
    }

    pub fn insert(&mut self, factor: Factor) {
        self.0 |= factor.bit();
    }

    pub fn contains(&self, factor: Factor) -> bool {
        self.0 & factor.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Factor> + '_ {
        Factor::ALL.into_iter().filter(|f| self.contains(*f))
    }

    /// Pipe-joined factor names, the journal/ledger representation.
    pub fn join(&self) -> String {
        self.iter()
            .map(Factor::name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Immutable per-bar signal produced by the confluence engine.
///
/// Consumed at most once by the risk manager; the cooldown prevents another
/// signal for `cooldown_bars` bars regardless of direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub bar: usize,
    pub direction: Direction,
    pub factors: FactorSet,
    /// ATR at the signal bar, carried so stops/takes can be recomputed from
    /// the realized fill price.
    pub atr: f64,
    /// Close at the signal bar (reference entry before fill modeling).
    pub close: f64,
}

impl Signal {
    pub fn confluence(&self) -> usize {
        self.factors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_bits_are_distinct() {
        for (i, a) in Factor::ALL.iter().enumerate() {
            for b in &Factor::ALL[i + 1..] {
                let mut set = FactorSet::new();
                set.insert(*a);
                assert!(!set.contains(*b), "{a:?} and {b:?} share a bit");
            }
        }
    }

    #[test]
    fn insert_contains_len() {
        let mut set = FactorSet::new();
        assert!(set.is_empty());
        set.insert(Factor::TrendAlign);
        set.insert(Factor::GapZone);
        set.insert(Factor::GapZone); // idempotent
        assert_eq!(set.len(), 2);
        assert!(set.contains(Factor::TrendAlign));
        assert!(set.contains(Factor::GapZone));
        assert!(!set.contains(Factor::EmaCross));
    }

    #[test]
    fn join_is_pipe_delimited_in_scoring_order() {
        let mut set = FactorSet::new();
        set.insert(Factor::LiquiditySweep);
        set.insert(Factor::TrendAlign);
        assert_eq!(set.join(), "trend_align|liquidity_sweep");
    }

    #[test]
    fn signal_confluence_counts_factors() {
        let mut factors = FactorSet::new();
        factors.insert(Factor::TrendAlign);
        factors.insert(Factor::RsiFilter);
        let sig = Signal {
            bar: 10,
            direction: Direction::Long,
            factors,
            atr: 1.5,
            close: 100.0,
        };
        assert_eq!(sig.confluence(), 2);
    }
}
