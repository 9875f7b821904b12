use crate::RlError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest lookahead `validate` accepts.
pub const MAX_N_STEP: usize = 1 << 16;

/// Hyperparameters of a training run.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// Rewards folded into each target before bootstrapping.
    pub n_step: usize,
    /// Replay memory capacity, in series.
    pub capacity: usize,
    pub gamma: f32,
    pub batch_size: usize,
    /// Environment steps collected at the start of every epoch.
    pub steps_per_epoch: usize,
    pub epochs: usize,
    pub moving_average_window: usize,
    /// Training stops once the moving average reaches this value.
    pub reward_threshold: f32,
    pub learning_rate: f32,
    /// Softmax policy temperature.
    pub temperature: f32,
    pub hidden_units: usize,
    pub seed: u64,
    /// Where the value function is exported after every epoch.
    pub checkpoint: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_step: 10,
            capacity: 10_000,
            gamma: 0.99,
            batch_size: 128,
            steps_per_epoch: 200,
            epochs: 100,
            moving_average_window: 100,
            reward_threshold: 1500.0,
            learning_rate: 0.001,
            temperature: 1.0,
            hidden_units: 40,
            seed: 0,
            checkpoint: None,
        }
    }
}

impl TrainConfig {
    pub fn from_json(json: &str) -> Result<Self, RlError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, RlError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), RlError> {
        let invalid = |msg: &str| Err(RlError::InvalidConfig(msg.to_string()));
        if self.n_step == 0 || self.n_step > MAX_N_STEP {
            return invalid("n_step must lie in 1..=65536");
        }
        if self.capacity == 0 || self.batch_size == 0 || self.moving_average_window == 0 {
            return invalid("capacity, batch_size and moving_average_window must be non-zero");
        }
        if self.hidden_units == 0 {
            return invalid("hidden_units must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return invalid("gamma must lie in [0, 1]");
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return invalid("learning_rate must be positive");
        }
        if self.temperature.is_nan() || self.temperature <= 0.0 {
            return invalid("temperature must be positive");
        }
        Ok(())
    }
}
