//! SMCLab CLI — run, sweep, and signal commands.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config and save artifacts
//! - `sweep` — replay the same config across fill seeds in parallel
//! - `signal` — report the most recent signal on a bar series, if any

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smclab_core::confluence::latest_signal;
use smclab_core::domain::AccountState;
use smclab_core::risk::RiskManager;
use smclab_runner::config::RunConfig;
use smclab_runner::data::load_bars;
use smclab_runner::runner::execute;
use smclab_runner::sweep::sweep_seeds;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smclab", about = "SMCLab CLI — confluence scoring backtester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Skip writing the artifact bundle.
        #[arg(long, default_value_t = false)]
        no_artifacts: bool,
    },
    /// Replay one config across many fill seeds and report the spread.
    Sweep {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Number of seeds, starting at --start-seed.
        #[arg(long, default_value_t = 16)]
        seeds: u64,

        /// First seed of the range.
        #[arg(long, default_value_t = 0)]
        start_seed: u64,

        /// Emit the full summary as JSON instead of the table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the most recent signal on the configured bar series.
    Signal {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            no_artifacts,
        } => cmd_run(&config, !no_artifacts),
        Commands::Sweep {
            config,
            seeds,
            start_seed,
            json,
        } => cmd_sweep(&config, seeds, start_seed, json),
        Commands::Signal { config } => cmd_signal(&config),
    }
}

fn cmd_run(config_path: &PathBuf, write_artifacts: bool) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let report = execute(&config, write_artifacts)?;

    let m = &report.metrics;
    println!("run            {}", report.run_id);
    println!("trades         {}", m.trade_count);
    println!("final equity   {:.2}", report.result.final_equity());
    println!("total return   {:+.2}%", m.total_return * 100.0);
    println!("max drawdown   {:.2}%", m.max_drawdown * 100.0);
    println!("win rate       {:.1}%", m.win_rate * 100.0);
    println!("profit factor  {:.2}", m.profit_factor);
    println!("sharpe         {:.2}", m.sharpe);
    if let Some(halt) = report.result.account.halt {
        println!("halt           {halt:?}");
    }
    if let Some(dir) = report.artifact_dir {
        println!("artifacts      {}", dir.display());
    }
    Ok(())
}

fn cmd_sweep(config_path: &PathBuf, seeds: u64, start_seed: u64, json: bool) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let params = config.params()?;
    let bars = load_bars(&config.data)
        .with_context(|| format!("loading bars from {}", config.data.display()))?;

    let seed_list: Vec<u64> = (start_seed..start_seed + seeds).collect();
    let summary = sweep_seeds(&bars, &params, config.initial_equity, &seed_list)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{:>6} {:>12} {:>9} {:>9} {:>7}", "seed", "equity", "return", "max dd", "trades");
    for row in &summary.rows {
        println!(
            "{:>6} {:>12.2} {:>8.2}% {:>8.2}% {:>7}",
            row.seed,
            row.final_equity,
            row.total_return * 100.0,
            row.max_drawdown * 100.0,
            row.trade_count
        );
    }
    println!(
        "mean return {:+.2}%  std {:.2}%  worst dd {:.2}%  profitable {:.0}%",
        summary.mean_return * 100.0,
        summary.std_return * 100.0,
        summary.worst_drawdown * 100.0,
        summary.profitable_fraction * 100.0
    );
    Ok(())
}

fn cmd_signal(config_path: &PathBuf) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let params = config.params()?;
    let bars = load_bars(&config.data)
        .with_context(|| format!("loading bars from {}", config.data.display()))?;

    match latest_signal(&bars, &params) {
        Some(signal) => {
            let bar = &bars[signal.bar];
            println!("bar        {} ({})", signal.bar, bar.timestamp.date_naive());
            println!("direction  {}", signal.direction);
            println!("close      {:.4}", signal.close);
            println!("atr        {:.4}", signal.atr);
            println!("confluence {}", signal.confluence());
            println!("factors    {}", signal.factors.join());

            // Size it against a fresh account at the configured equity.
            let risk = RiskManager::new(params.clone());
            let mut account = AccountState::new(config.initial_equity);
            match risk.evaluate(&signal, &mut account) {
                Ok(order) => {
                    println!("quantity   {:.4}", order.quantity);
                    println!("stop       {:.4}", order.stop_price);
                    println!("take       {:.4}", order.take_price);
                }
                Err(veto) => println!("order      vetoed: {veto}"),
            }
        }
        None => println!("no signal on this series"),
    }
    Ok(())
}
