use crate::pursuit::Pursuit;
use crate::Args;
use anyhow::{Context, Result};
use rl::{TrainConfig, Trainer};

/// Resolves the configuration, then trains until the epoch budget runs out
/// or the reward threshold is met.
pub fn run(args: Args) -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = resolve_config(&args)?;
    tracing::info!(?config, "starting training");

    let env = Pursuit::new(config.seed);
    let mut trainer = Trainer::from_config(config, env).context("failed to build trainer")?;
    let summary = trainer.train().context("training failed")?;

    if summary.solved {
        tracing::info!(
            epochs = summary.epochs,
            episodes = summary.episodes,
            "solved with average reward {}",
            summary.average_reward
        );
    } else {
        tracing::warn!(
            epochs = summary.epochs,
            episodes = summary.episodes,
            "epoch budget exhausted at average reward {}",
            summary.average_reward
        );
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<TrainConfig> {
    let mut config = match &args.config {
        Some(path) => TrainConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => TrainConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(n_step) = args.n_step {
        config.n_step = n_step;
    }
    if let Some(threshold) = args.threshold {
        config.reward_threshold = threshold;
    }
    if args.checkpoint.is_some() {
        config.checkpoint.clone_from(&args.checkpoint);
    }
    config.validate()?;
    Ok(config)
}
