//! Fill model — realized prices with friction.
//!
//! Entries fill at the next bar's open. Randomized mode perturbs the open by
//! a signed uniform jitter bounded by ATR x `fill_jitter_factor`, clipped to
//! the bar's [low, high], then charges ATR-scaled slippage against the
//! trader. A half-spread fraction is charged against the trader on both entry
//! and exit. Deterministic mode fills exactly at the open, spread only.

use crate::config::{FillMode, StrategyParams};
use crate::domain::{Bar, Direction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Owns the RNG for one run. Two models built from the same params produce
/// identical fill sequences.
#[derive(Debug)]
pub struct FillModel {
    mode: FillMode,
    jitter_factor: f64,
    slippage_factor: f64,
    spread_fraction: f64,
    rng: StdRng,
}

impl FillModel {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            mode: params.fill_mode,
            jitter_factor: params.fill_jitter_factor,
            slippage_factor: params.slippage_factor,
            spread_fraction: params.spread_fraction,
            rng: StdRng::seed_from_u64(params.seed),
        }
    }

    /// Realized entry price for a market order filling on `bar`'s open.
    pub fn entry_fill(&mut self, bar: &Bar, direction: Direction, atr: f64) -> f64 {
        let mut price = bar.open;

        if self.mode == FillMode::Randomized {
            let bound = atr * self.jitter_factor;
            if bound > 0.0 {
                let jitter = self.rng.gen_range(-bound..=bound);
                price = (price + jitter).clamp(bar.low, bar.high);
            }
            // Slippage is always adverse.
            price += direction.sign() * atr * self.slippage_factor;
        }

        price * (1.0 + direction.sign() * self.spread_fraction)
    }

    /// Realized exit price for a position closing at `level` (stop, take, or
    /// final close). Exits cross the spread on the opposite side.
    pub fn exit_fill(&self, level: f64, direction: Direction) -> f64 {
        level * (1.0 - direction.sign() * self.spread_fraction)
    }
}
