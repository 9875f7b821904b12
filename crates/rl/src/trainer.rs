//! The epoch loop tying collection, replay and regression together.

use crate::config::TrainConfig;
use crate::env::Env;
use crate::moving_average::MovingAverage;
use crate::nstep::NStepProgress;
use crate::policy::{Policy, SoftmaxPolicy};
use crate::replay::ReplayMemory;
use crate::trace::{EligibilityTrace, TrainingBatch};
use crate::value::{QNetwork, ValueFunction};
use crate::RlError;
use tracing::{debug, info};

/// What one call to [`Trainer::run_epoch`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Series produced by this epoch's environment steps.
    pub series_collected: usize,
    pub memory_len: usize,
    pub batches: usize,
    /// Mean regression loss over the epoch's batches, `None` without batches.
    pub mean_loss: Option<f32>,
    /// Episodes that finished during this epoch.
    pub episodes_finished: usize,
    pub average_reward: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainSummary {
    pub epochs: usize,
    pub solved: bool,
    pub average_reward: f32,
    pub episodes: usize,
}

/// Owns every piece of a training run. Nothing is global, so several
/// trainers can coexist in one process.
pub struct Trainer<E: Env, V: ValueFunction, P: Policy> {
    config: TrainConfig,
    stepper: NStepProgress<E>,
    memory: ReplayMemory,
    trace: EligibilityTrace,
    value_fn: V,
    policy: P,
    average: MovingAverage,
    epoch: usize,
}

impl<E: Env> Trainer<E, QNetwork, SoftmaxPolicy> {
    /// Builds the default perceptron value function and softmax policy from
    /// `config`, sized for `env`.
    pub fn from_config(config: TrainConfig, env: E) -> Result<Self, RlError> {
        config.validate()?;
        let value_fn = QNetwork::new(
            env.observation_shape(),
            config.hidden_units,
            env.action_count(),
            config.learning_rate,
            config.seed,
        )?;
        let policy = SoftmaxPolicy::new(config.temperature, config.seed.wrapping_add(1));
        Self::new(config, env, value_fn, policy)
    }
}

impl<E: Env, V: ValueFunction, P: Policy> Trainer<E, V, P> {
    pub fn new(config: TrainConfig, env: E, value_fn: V, policy: P) -> Result<Self, RlError> {
        config.validate()?;
        if env.observation_shape() != value_fn.observation_shape() {
            return Err(RlError::shape(
                "value function observation",
                env.observation_shape(),
                value_fn.observation_shape(),
            ));
        }
        if env.action_count() != value_fn.action_count() {
            return Err(RlError::shape(
                "value function actions",
                &[env.action_count()],
                &[value_fn.action_count()],
            ));
        }
        Ok(Self {
            stepper: NStepProgress::new(env, config.n_step)?,
            memory: ReplayMemory::new(config.capacity, config.seed)?,
            trace: EligibilityTrace::new(config.gamma),
            average: MovingAverage::new(config.moving_average_window),
            value_fn,
            policy,
            config,
            epoch: 0,
        })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn value_fn(&self) -> &V {
        &self.value_fn
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn stepper(&self) -> &NStepProgress<E> {
        &self.stepper
    }

    pub fn average(&self) -> &MovingAverage {
        &self.average
    }

    /// Collects `steps_per_epoch` environment steps, trains once on every
    /// chunk of a shuffled pass over the replay memory, then folds finished
    /// episode rewards into the moving average and exports the value
    /// function if a checkpoint path is configured.
    ///
    /// Fails with [`RlError::EnvironmentClosed`] once [`train`](Self::train)
    /// has quit the environment.
    pub fn run_epoch(&mut self) -> Result<EpochReport, RlError> {
        if self.stepper.is_closed() {
            return Err(RlError::EnvironmentClosed);
        }
        self.epoch += 1;
        let fresh = self
            .stepper
            .run_steps(self.config.steps_per_epoch, &self.value_fn, &mut self.policy)?;
        let series_collected = fresh.len();
        self.memory.ingest(fresh);

        let mut batches = 0;
        let mut loss_sum = 0.0;
        for batch in self.memory.sample_batch(self.config.batch_size)? {
            let TrainingBatch { inputs, targets } = self.trace.build(&self.value_fn, &batch)?;
            loss_sum += self.value_fn.update(&inputs, &targets)?;
            batches += 1;
        }
        let mean_loss = (batches > 0).then(|| loss_sum / batches as f32);

        let rewards = self.stepper.rewards_steps();
        let episodes_finished = rewards.len();
        self.average.add(rewards);
        let average_reward = self.average.average();

        if let Some(path) = &self.config.checkpoint {
            self.value_fn.export(path)?;
            debug!(path = %path.display(), "value function exported");
        }

        info!(
            epoch = self.epoch,
            average_reward,
            episodes_finished,
            batches,
            memory = self.memory.len(),
            "Epoch: {}, Average Reward: {}",
            self.epoch,
            average_reward
        );

        Ok(EpochReport {
            epoch: self.epoch,
            series_collected,
            memory_len: self.memory.len(),
            batches,
            mean_loss,
            episodes_finished,
            average_reward,
        })
    }

    /// Runs epochs until `config.epochs` is reached or the moving average
    /// meets `config.reward_threshold`, then quits the environment.
    ///
    /// The environment is quit even when an epoch fails; the epoch's error is
    /// returned in that case. A trainer trains once: later calls fail with
    /// [`RlError::EnvironmentClosed`].
    pub fn train(&mut self) -> Result<TrainSummary, RlError> {
        if self.stepper.is_closed() {
            return Err(RlError::EnvironmentClosed);
        }
        let outcome = self.train_epochs();
        let quit = self.stepper.quit();
        let summary = outcome?;
        quit?;
        Ok(summary)
    }

    fn train_epochs(&mut self) -> Result<TrainSummary, RlError> {
        let mut solved = false;
        while self.epoch < self.config.epochs {
            let report = self.run_epoch()?;
            if report.average_reward >= self.config.reward_threshold {
                info!(epoch = report.epoch, average_reward = report.average_reward, "reward threshold reached");
                solved = true;
                break;
            }
        }
        Ok(TrainSummary {
            epochs: self.epoch,
            solved,
            average_reward: self.average.average(),
            episodes: self.stepper.episodes_completed(),
        })
    }
}
