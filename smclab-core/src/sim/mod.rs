//! Execution simulator — next-bar-open fills and the walk-forward replay.

pub mod fill;
pub mod replay;

pub use fill::FillModel;
pub use replay::{run_backtest, BacktestError, BacktestResult};
