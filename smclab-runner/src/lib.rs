//! SMCLab Runner — configuration, data loading, metrics, artifacts, sweeps.
//!
//! This crate wraps the core engine with everything a run needs around it:
//! TOML configs with content-addressed run ids, CSV bar loading, performance
//! metrics, the artifact bundle, and parallel seed sweeps.

pub mod artifacts;
pub mod config;
pub mod data;
pub mod metrics;
pub mod runner;
pub mod sweep;
