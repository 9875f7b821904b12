use crate::RlError;
use ml::Tensor;
use std::ops::Deref;
use std::sync::Arc;

/// One environment transition: the observation the action was chosen from,
/// the action, the reward it earned and whether it ended the episode.
#[derive(Clone, Debug)]
pub struct Step {
    pub state: Tensor,
    pub action: usize,
    pub reward: f32,
    pub done: bool,
}

/// A chronological window of steps from a single episode.
///
/// Steps are reference counted so overlapping windows of the same episode
/// share them.
#[derive(Clone, Debug)]
pub struct Series {
    steps: Vec<Arc<Step>>,
}

impl Series {
    pub(crate) fn new(steps: Vec<Arc<Step>>) -> Self {
        debug_assert!(steps.len() >= 2);
        Self { steps }
    }

    /// Builds a series from owned steps, checking the window invariants:
    /// at least two steps and `done` on the last step only.
    pub fn from_steps(steps: impl IntoIterator<Item = Step>) -> Result<Self, RlError> {
        let steps: Vec<Arc<Step>> = steps.into_iter().map(Arc::new).collect();
        if steps.len() < 2 {
            return Err(RlError::InvalidSeries("a series needs at least two steps"));
        }
        if steps[..steps.len() - 1].iter().any(|step| step.done) {
            return Err(RlError::InvalidSeries("only the last step may be terminal"));
        }
        Ok(Self { steps })
    }

    pub fn first(&self) -> &Step {
        &self.steps[0]
    }

    pub fn last(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    pub fn is_terminal(&self) -> bool {
        self.last().done
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Step> + ExactSizeIterator {
        self.steps.iter().map(Deref::deref)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when both series hold the very same step at `index`.
    pub fn shares_step(&self, other: &Series, index: usize, other_index: usize) -> bool {
        match (self.steps.get(index), other.steps.get(other_index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
