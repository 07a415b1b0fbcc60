//! Artifact export — JSON summary, trade tape CSV, equity curve CSV.
//!
//! Every run writes a bundle under `<output_dir>/<run_id>/`:
//! - `summary.json` — config, params, metrics, terminal account state
//! - `trades.csv` — the trade ledger, factors pipe-joined in one column
//! - `equity.csv` — bar-by-bar equity
//!
//! `summary.json` carries a `schema_version`; unknown versions are rejected
//! on load.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use smclab_core::config::StrategyParams;
use smclab_core::domain::{AccountState, ExitKind, TradeRecord};
use std::path::{Path, PathBuf};

use crate::config::{RunConfig, RunId};
use crate::metrics::PerformanceMetrics;

pub const SCHEMA_VERSION: u32 = 1;

/// The JSON artifact describing one finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: RunConfig,
    pub params: StrategyParams,
    pub metrics: PerformanceMetrics,
    pub account: AccountState,
}

/// Serialize a run summary to pretty JSON.
pub fn export_summary_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize run summary")
}

/// Deserialize a run summary, rejecting unknown schema versions.
pub fn import_summary_json(json: &str) -> Result<RunSummary> {
    let summary: RunSummary =
        serde_json::from_str(json).context("failed to deserialize run summary")?;
    if summary.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            summary.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(summary)
}

fn exit_kind_label(kind: ExitKind) -> &'static str {
    match kind {
        ExitKind::Stop => "stop",
        ExitKind::Take => "take",
        ExitKind::SessionEnd => "session_end",
    }
}

/// Export the trade ledger as CSV.
pub fn export_trades_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "direction",
        "quantity",
        "entry_bar",
        "entry_price",
        "exit_bar",
        "exit_price",
        "stop_price",
        "take_price",
        "pnl",
        "exit_kind",
        "confluence",
        "factors",
    ])?;

    for t in trades {
        wtr.write_record([
            t.direction.to_string(),
            format!("{:.4}", t.quantity),
            t.entry_bar.to_string(),
            format!("{:.6}", t.entry_price),
            t.exit_bar.to_string(),
            format!("{:.6}", t.exit_price),
            format!("{:.6}", t.stop_price),
            format!("{:.6}", t.take_price),
            format!("{:.2}", t.pnl),
            exit_kind_label(t.exit_kind).to_string(),
            t.confluence().to_string(),
            t.factors.join(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the equity curve as CSV with bar index and equity columns.
pub fn export_equity_csv(equity_curve: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["bar_index", "equity"])?;
    for (i, eq) in equity_curve.iter().enumerate() {
        wtr.write_record([i.to_string(), format!("{eq:.2}")])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the full artifact bundle and return the run directory.
pub fn save_artifacts(
    summary: &RunSummary,
    trades: &[TradeRecord],
    equity_curve: &[f64],
    output_dir: &Path,
) -> Result<PathBuf> {
    let run_dir = output_dir.join(&summary.run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir {}", run_dir.display()))?;

    std::fs::write(run_dir.join("summary.json"), export_summary_json(summary)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(trades)?)?;
    std::fs::write(run_dir.join("equity.csv"), export_equity_csv(equity_curve)?)?;

    Ok(run_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smclab_core::domain::{Direction, Factor, FactorSet};

    fn sample_trade() -> TradeRecord {
        let mut factors = FactorSet::new();
        factors.insert(Factor::TrendAlign);
        factors.insert(Factor::OrderBlock);
        TradeRecord {
            direction: Direction::Long,
            quantity: 0.3778,
            entry_bar: 12,
            entry_price: 180.02,
            exit_bar: 18,
            exit_price: 198.0,
            stop_price: 171.0,
            take_price: 198.0,
            pnl: 6.79,
            exit_kind: ExitKind::Take,
            factors,
        }
    }

    fn sample_summary() -> RunSummary {
        let config: RunConfig = toml::from_str(r#"data = "bars.csv""#).unwrap();
        let params = config.params().unwrap();
        RunSummary {
            schema_version: SCHEMA_VERSION,
            run_id: config.run_id(),
            config,
            params,
            metrics: PerformanceMetrics::compute(&[10_000.0, 10_006.79], &[sample_trade()]),
            account: AccountState::new(10_000.0),
        }
    }

    #[test]
    fn trades_csv_has_header_and_joined_factors() {
        let csv = export_trades_csv(&[sample_trade()]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("direction,quantity"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("LONG,0.3778,12"));
        assert!(row.contains("take"));
        assert!(row.contains("trend_align|order_block"));
    }

    #[test]
    fn equity_csv_rows_match_curve() {
        let csv = export_equity_csv(&[10_000.0, 10_050.0, 9_980.0]).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn summary_roundtrip() {
        let summary = sample_summary();
        let json = export_summary_json(&summary).unwrap();
        let back = import_summary_json(&json).unwrap();
        assert_eq!(back.run_id, summary.run_id);
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn future_schema_rejected() {
        let mut summary = sample_summary();
        summary.schema_version = SCHEMA_VERSION + 1;
        let json = export_summary_json(&summary).unwrap();
        assert!(import_summary_json(&json).is_err());
    }

    #[test]
    fn artifacts_land_in_run_dir() {
        let dir = tempfile::tempdir().unwrap();
        let summary = sample_summary();
        let run_dir = save_artifacts(
            &summary,
            &[sample_trade()],
            &[10_000.0, 10_006.79],
            dir.path(),
        )
        .unwrap();
        assert!(run_dir.join("summary.json").exists());
        assert!(run_dir.join("trades.csv").exists());
        assert!(run_dir.join("equity.csv").exists());
    }
}
