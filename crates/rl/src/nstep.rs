//! Turns environment interaction into n-step [`Series`].

use crate::env::{Env, Transition};
use crate::experience::{Series, Step};
use crate::history::HistoryBuffer;
use crate::policy::Policy;
use crate::value::ValueFunction;
use crate::RlError;
use ml::Tensor;
use tracing::{debug, trace};

/// Drives an [`Env`] one action at a time and windows the running episode.
///
/// Every non-terminal step that fills the history emits one series of
/// `n_step + 1` steps. A terminal step flushes every suffix of the history
/// down to length two, then the environment is reset and a fresh history
/// begins.
pub struct NStepProgress<E: Env> {
    env: E,
    n_step: usize,
    history: HistoryBuffer,
    observation: Option<Tensor>,
    episode_reward: f32,
    rewards: Vec<f32>,
    episodes: usize,
    steps: u64,
    closed: bool,
}

impl<E: Env> NStepProgress<E> {
    pub fn new(env: E, n_step: usize) -> Result<Self, RlError> {
        if n_step == 0 || n_step == usize::MAX {
            return Err(RlError::InvalidConfig("n_step must lie in 1..usize::MAX".into()));
        }
        Ok(Self {
            env,
            n_step,
            history: HistoryBuffer::new(n_step),
            observation: None,
            episode_reward: 0.0,
            rewards: Vec::new(),
            episodes: 0,
            steps: 0,
            closed: false,
        })
    }

    pub fn n_step(&self) -> usize {
        self.n_step
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Episodes finished since construction.
    pub fn episodes_completed(&self) -> usize {
        self.episodes
    }

    /// Environment steps taken since construction.
    pub fn total_steps(&self) -> u64 {
        self.steps
    }

    /// True once [`quit`](Self::quit) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Reward collected so far in the running episode.
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Advances the environment exactly `count` times and returns the series
    /// produced along the way, in emission order.
    ///
    /// Fails with [`RlError::EnvironmentClosed`] after [`quit`](Self::quit).
    pub fn run_steps<V, P>(&mut self, count: usize, value_fn: &V, policy: &mut P) -> Result<Vec<Series>, RlError>
    where
        V: ValueFunction + ?Sized,
        P: Policy + ?Sized,
    {
        if self.closed {
            return Err(RlError::EnvironmentClosed);
        }
        let mut emitted = Vec::new();
        for _ in 0..count {
            self.advance(value_fn, policy, &mut emitted)?;
        }
        Ok(emitted)
    }

    fn advance<V, P>(&mut self, value_fn: &V, policy: &mut P, emitted: &mut Vec<Series>) -> Result<(), RlError>
    where
        V: ValueFunction + ?Sized,
        P: Policy + ?Sized,
    {
        let state = match self.observation.take() {
            Some(observation) => observation,
            None => self.reset()?,
        };

        let values = value_fn.forward(&Tensor::stack(&[&state])?)?;
        let action = policy.select(values.row(0))?;
        let actions = self.env.action_count();
        if action >= actions {
            return Err(RlError::ActionOutOfRange { action, actions });
        }

        let Transition { observation, reward, done } = self.env.step(action).map_err(RlError::Environment)?;
        self.steps += 1;
        self.episode_reward += reward;
        self.history.push(Step { state, action, reward, done });

        if done {
            let windows = self.history.drain_suffixes();
            trace!(windows = windows.len(), "flushed terminal windows");
            emitted.extend(windows);
            self.rewards.push(self.episode_reward);
            self.episodes += 1;
            debug!(episode = self.episodes, reward = self.episode_reward, "episode finished");
            self.observation = Some(self.reset()?);
        } else {
            if let Some(window) = self.history.window() {
                trace!(len = window.len(), "window emitted");
                emitted.push(window);
            }
            self.observation = Some(self.check_shape(observation)?);
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<Tensor, RlError> {
        self.history.clear();
        self.episode_reward = 0.0;
        let observation = self.env.reset().map_err(RlError::Environment)?;
        self.check_shape(observation)
    }

    fn check_shape(&self, observation: Tensor) -> Result<Tensor, RlError> {
        let expected = self.env.observation_shape();
        if observation.shape != expected {
            return Err(RlError::shape("observation", expected, &observation.shape));
        }
        Ok(observation)
    }

    /// Total rewards of the episodes completed since the previous call.
    /// Each reward is reported exactly once.
    pub fn rewards_steps(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.rewards)
    }

    /// Quits the environment once. Later calls do nothing.
    pub fn quit(&mut self) -> Result<(), RlError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.env.quit().map_err(RlError::Environment)
    }
}
