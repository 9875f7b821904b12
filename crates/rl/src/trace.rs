//! n-step Q-learning targets from sampled series.

use crate::experience::Series;
use crate::value::ValueFunction;
use crate::RlError;
use ml::Tensor;
use std::sync::Arc;

pub const DEFAULT_GAMMA: f32 = 0.99;

/// Stacked regression inputs and targets for one optimizer step.
#[derive(Clone, Debug)]
pub struct TrainingBatch {
    /// `[batch, ..observation]`, the first state of every series.
    pub inputs: Tensor,
    /// `[batch, actions]`.
    pub targets: Tensor,
}

/// Discounted return of `rewards` followed by `bootstrap`, folded backward:
/// `r0 + γ r1 + … + γ^(n-1) r(n-1) + γ^n bootstrap`.
pub fn discounted_return(rewards: impl DoubleEndedIterator<Item = f32>, bootstrap: f32, gamma: f32) -> f32 {
    rewards.rev().fold(bootstrap, |cumulative, reward| reward + gamma * cumulative)
}

/// Builds n-step targets ("eligibility trace") from series.
#[derive(Clone, Copy, Debug)]
pub struct EligibilityTrace {
    gamma: f32,
}

impl Default for EligibilityTrace {
    fn default() -> Self {
        Self { gamma: DEFAULT_GAMMA }
    }
}

impl EligibilityTrace {
    pub fn new(gamma: f32) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Target row for one series.
    ///
    /// The first and last states go through `value_fn` as one two-row batch.
    /// The bootstrap is `0` when the series ends the episode, otherwise the
    /// greedy value at the last state. Rewards of every step but the last are
    /// folded in backward. The returned row is a copy of the values at the
    /// first state with only the taken action's entry replaced.
    pub fn target<V: ValueFunction + ?Sized>(&self, value_fn: &V, series: &Series) -> Result<Vec<f32>, RlError> {
        let first = series.first();
        let last = series.last();
        let output = value_fn.forward(&Tensor::stack(&[&first.state, &last.state])?)?;
        let actions = value_fn.action_count();
        if output.shape != [2, actions] {
            return Err(RlError::shape("value function output", &[2, actions], &output.shape));
        }
        if first.action >= actions {
            return Err(RlError::ActionOutOfRange { action: first.action, actions });
        }

        let bootstrap = if last.done {
            0.0
        } else {
            output.row(1).iter().copied().fold(f32::NEG_INFINITY, f32::max)
        };
        let cumulative = discounted_return(
            series.iter().take(series.len() - 1).map(|step| step.reward),
            bootstrap,
            self.gamma,
        );

        let mut target = output.row(0).to_vec();
        target[first.action] = cumulative;
        Ok(target)
    }

    /// Builds the regression batch for `batch`, one row per series.
    pub fn build<V: ValueFunction + ?Sized>(&self, value_fn: &V, batch: &[Arc<Series>]) -> Result<TrainingBatch, RlError> {
        if batch.is_empty() {
            return Err(RlError::InvalidSeries("cannot build targets for an empty batch"));
        }
        let actions = value_fn.action_count();
        let mut targets = Vec::with_capacity(batch.len() * actions);
        let mut states = Vec::with_capacity(batch.len());
        for series in batch {
            targets.extend(self.target(value_fn, series)?);
            states.push(&series.first().state);
        }
        Ok(TrainingBatch {
            inputs: Tensor::stack(&states)?,
            targets: Tensor::from_vec(vec![batch.len(), actions], targets),
        })
    }
}
