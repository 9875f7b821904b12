//! # nstep
//!
//! Command-line entry point. Loads a [`rl::TrainConfig`], applies flag
//! overrides and trains on the built-in [`pursuit::Pursuit`] environment.

mod app;
mod pursuit;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// JSON file with training hyperparameters.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub epochs: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long = "n-step")]
    pub n_step: Option<usize>,
    /// Export the value function here after every epoch.
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,
    /// Stop once the moving average reward reaches this value.
    #[arg(long)]
    pub threshold: Option<f32>,
}

fn main() -> Result<()> {
    app::run(Args::parse())
}
