//! Run orchestration: config in, artifact bundle out.

use anyhow::{Context, Result};
use smclab_core::sim::{run_backtest, BacktestResult};
use std::path::PathBuf;
use tracing::info;

use crate::artifacts::{save_artifacts, RunSummary, SCHEMA_VERSION};
use crate::config::{RunConfig, RunId};
use crate::data::load_bars;
use crate::metrics::PerformanceMetrics;

/// A finished run plus everything derived from it.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub result: BacktestResult,
    pub metrics: PerformanceMetrics,
    /// Set when artifacts were written.
    pub artifact_dir: Option<PathBuf>,
}

/// Load data, replay, compute metrics, and optionally persist artifacts.
pub fn execute(config: &RunConfig, write_artifacts: bool) -> Result<RunReport> {
    let run_id = config.run_id();
    let params = config.params()?;
    let bars = load_bars(&config.data)
        .with_context(|| format!("loading bars from {}", config.data.display()))?;

    info!(run_id = %run_id, bars = bars.len(), "starting replay");
    let result = run_backtest(&bars, &params, config.initial_equity)
        .context("backtest replay failed")?;
    let metrics = PerformanceMetrics::compute(&result.equity_curve, &result.trades);

    let artifact_dir = if write_artifacts {
        let summary = RunSummary {
            schema_version: SCHEMA_VERSION,
            run_id: run_id.clone(),
            config: config.clone(),
            params,
            metrics: metrics.clone(),
            account: result.account.clone(),
        };
        let dir = save_artifacts(
            &summary,
            &result.trades,
            &result.equity_curve,
            &config.output_dir,
        )?;
        info!(dir = %dir.display(), "artifacts written");
        Some(dir)
    } else {
        None
    };

    Ok(RunReport {
        run_id,
        result,
        metrics,
        artifact_dir,
    })
}
