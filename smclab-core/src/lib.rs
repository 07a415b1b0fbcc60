//! SMCLab Core — signal scoring, risk sizing, and the backtest simulator.
//!
//! The pipeline is strictly layered:
//! - Domain types (bars, signals, positions, trades, account ledger)
//! - Indicator frame (EMA, RSI, MACD, ATR, divergence flags)
//! - Structure scan (imbalance gaps, order blocks, liquidity sweeps)
//! - Confluence engine (mandatory trend gate + confirming factor count)
//! - Risk manager (fixed-fractional sizing, Kelly-Lite cap, circuit breakers)
//! - Simulator (next-bar-open fills, walk-forward replay)
//!
//! Nothing in this crate touches the filesystem or the network; data loading
//! and artifact writing live in the runner crate.

pub mod config;
pub mod confluence;
pub mod domain;
pub mod indicators;
pub mod risk;
pub mod series;
pub mod sim;
pub mod structure;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline types are Send + Sync so the runner can
    /// fan runs out across rayon workers.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::AccountState>();
        require_sync::<domain::AccountState>();

        require_send::<config::StrategyParams>();
        require_sync::<config::StrategyParams>();

        require_send::<indicators::IndicatorFrame>();
        require_sync::<indicators::IndicatorFrame>();
        require_send::<structure::StructureScan>();
        require_sync::<structure::StructureScan>();

        require_send::<confluence::ConfluenceEngine>();
        require_sync::<confluence::ConfluenceEngine>();
        require_send::<risk::RiskManager>();
        require_sync::<risk::RiskManager>();

        require_send::<sim::BacktestResult>();
        require_sync::<sim::BacktestResult>();
    }
}
