//! Domain types: bars, directions, signals, positions, trades, account state.

pub mod account;
pub mod bar;
pub mod direction;
pub mod position;
pub mod signal;
pub mod trade;

pub use account::{AccountState, HaltReason};
pub use bar::Bar;
pub use direction::Direction;
pub use position::Position;
pub use signal::{Factor, FactorSet, Signal};
pub use trade::{ExitKind, TradeRecord};
