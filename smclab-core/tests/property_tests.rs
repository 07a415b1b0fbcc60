//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify, over arbitrary price paths:
//! 1. The replay never panics and always yields a full equity curve
//! 2. Per-trade risk never exceeds the configured fraction of peak equity
//! 3. Signals are spaced by at least the cooldown
//! 4. Replays are deterministic for a fixed seed

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use smclab_core::config::{FillMode, StrategyParams};
use smclab_core::confluence::latest_signal;
use smclab_core::domain::Bar;
use smclab_core::sim::run_backtest;

fn bars_from_path(steps: &[f64]) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    let mut price: f64 = 100.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, &step)| {
            price = (price + step).max(5.0);
            let open = price - 0.3;
            let close = price + 0.2;
            Bar {
                timestamp: base + Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

fn test_params(seed: u64) -> StrategyParams {
    StrategyParams {
        ema_fast: 5,
        ema_slow: 10,
        rsi_period: 7,
        macd_fast: 5,
        macd_slow: 10,
        macd_signal: 4,
        atr_period: 7,
        swing_window: 3,
        divergence_pair_span: 3,
        fvg_lookback: 20,
        ob_lookback: 10,
        sweep_lookback: 10,
        min_confluence: 1,
        cooldown_bars: 4,
        fill_mode: FillMode::Randomized,
        seed,
        ..StrategyParams::daily()
    }
}

fn arb_path() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-2.0..2.5_f64, 120..240)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any path long enough to warm up replays without panicking, and the
    /// equity curve covers every bar.
    #[test]
    fn replay_total_on_arbitrary_paths(steps in arb_path(), seed in 0u64..1000) {
        let bars = bars_from_path(&steps);
        let result = run_backtest(&bars, &test_params(seed), 10_000.0).unwrap();
        prop_assert_eq!(result.equity_curve.len(), bars.len());
        prop_assert!(result.final_equity().is_finite());
    }

    /// A stop hit never loses more than the risk fraction of realized equity
    /// at the signal bar (the bar before entry).
    #[test]
    fn per_trade_risk_bounded(steps in arb_path(), seed in 0u64..1000) {
        let params = test_params(seed);
        let bars = bars_from_path(&steps);
        let result = run_backtest(&bars, &params, 10_000.0).unwrap();

        for trade in &result.trades {
            let signal_bar = trade.entry_bar - 1;
            let realized: f64 = result
                .trades
                .iter()
                .filter(|t| t.exit_bar <= signal_bar)
                .map(|t| t.pnl)
                .sum();
            let equity_at_signal = 10_000.0 + realized;
            let at_risk = trade.quantity * (trade.entry_price - trade.stop_price).abs();
            // Sized against the signal-bar close; the realized fill moves the
            // distance by friction only, so allow a small tolerance.
            prop_assert!(
                at_risk <= equity_at_signal * params.risk_per_trade * 1.05,
                "trade risks {} against equity {}",
                at_risk,
                equity_at_signal
            );
        }
    }

    /// Consecutive entries are at least `cooldown_bars` apart.
    #[test]
    fn cooldown_holds_on_arbitrary_paths(steps in arb_path(), seed in 0u64..1000) {
        let params = test_params(seed);
        let bars = bars_from_path(&steps);
        let result = run_backtest(&bars, &params, 10_000.0).unwrap();

        let mut entries: Vec<usize> = result.trades.iter().map(|t| t.entry_bar).collect();
        entries.sort_unstable();
        for pair in entries.windows(2) {
            prop_assert!(pair[1] - pair[0] >= params.cooldown_bars);
        }
    }

    /// Two replays with identical inputs produce identical ledgers.
    #[test]
    fn replay_is_deterministic(steps in arb_path(), seed in 0u64..1000) {
        let params = test_params(seed);
        let bars = bars_from_path(&steps);
        let a = run_backtest(&bars, &params, 10_000.0).unwrap();
        let b = run_backtest(&bars, &params, 10_000.0).unwrap();
        prop_assert_eq!(a.trades, b.trades);
        prop_assert_eq!(a.equity_curve, b.equity_curve);
        prop_assert_eq!(a.account, b.account);
    }

    /// The live-boundary query agrees with a full scan: if it returns a
    /// signal, that signal's bar is within the series.
    #[test]
    fn latest_signal_is_in_range(steps in arb_path()) {
        let params = test_params(0);
        let bars = bars_from_path(&steps);
        if let Some(signal) = latest_signal(&bars, &params) {
            prop_assert!(signal.bar < bars.len());
            prop_assert!(signal.atr.is_finite());
        }
    }
}
