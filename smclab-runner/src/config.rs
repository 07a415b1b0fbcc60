//! Serializable run configuration.
//!
//! A TOML file names the data source, the timeframe preset, and any parameter
//! overrides. The resolved config hashes to a content-addressed run id, so
//! identical configs land in the same artifact directory.

use serde::{Deserialize, Serialize};
use smclab_core::config::{FillMode, ParamError, StrategyParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content-addressed identifier for a run.
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Params(#[from] ParamError),
}

/// Timeframe preset selecting the base parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    FourHour,
}

impl Timeframe {
    pub fn base_params(self) -> StrategyParams {
        match self {
            Timeframe::Daily => StrategyParams::daily(),
            Timeframe::FourHour => StrategyParams::four_hour(),
        }
    }
}

/// Optional per-field overrides on top of the timeframe preset. Absent fields
/// keep the preset value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamOverrides {
    pub min_confluence: Option<usize>,
    pub cooldown_bars: Option<usize>,
    pub risk_per_trade: Option<f64>,
    pub atr_stop_mult: Option<f64>,
    pub atr_take_mult: Option<f64>,
    pub use_kelly: Option<bool>,
    pub fill_mode: Option<FillMode>,
    pub seed: Option<u64>,
}

impl ParamOverrides {
    fn apply(&self, mut params: StrategyParams) -> StrategyParams {
        if let Some(v) = self.min_confluence {
            params.min_confluence = v;
        }
        if let Some(v) = self.cooldown_bars {
            params.cooldown_bars = v;
        }
        if let Some(v) = self.risk_per_trade {
            params.risk_per_trade = v;
        }
        if let Some(v) = self.atr_stop_mult {
            params.atr_stop_mult = v;
        }
        if let Some(v) = self.atr_take_mult {
            params.atr_take_mult = v;
        }
        if let Some(v) = self.use_kelly {
            params.use_kelly = v;
        }
        if let Some(v) = self.fill_mode {
            params.fill_mode = v;
        }
        if let Some(v) = self.seed {
            params.seed = v;
        }
        params
    }
}

/// Everything needed to reproduce a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// CSV bar file.
    pub data: PathBuf,

    #[serde(default = "default_timeframe")]
    pub timeframe: Timeframe,

    #[serde(default = "default_initial_equity")]
    pub initial_equity: f64,

    /// Artifact root; each run writes into `<output_dir>/<run_id>/`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub overrides: ParamOverrides,
}

fn default_timeframe() -> Timeframe {
    Timeframe::Daily
}

fn default_initial_equity() -> f64 {
    10_000.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("runs")
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = toml::from_str(&text)?;
        config.params()?;
        Ok(config)
    }

    /// Resolve the preset plus overrides into validated strategy parameters.
    pub fn params(&self) -> Result<StrategyParams, ConfigError> {
        let params = self.overrides.apply(self.timeframe.base_params());
        params.validate()?;
        Ok(params)
    }

    /// Deterministic hash of the full configuration. Two identical configs
    /// always share a run id.
    pub fn run_id(&self) -> RunId {
        // RunConfig always serializes: all fields are plain data.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
