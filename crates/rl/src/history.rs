use crate::experience::{Series, Step};
use std::collections::VecDeque;
use std::sync::Arc;

/// Sliding window over the most recent steps of the running episode.
///
/// Holds at most `n_step + 1` steps. Once full, every new step evicts the
/// oldest one and the buffer yields a full-length [`Series`] per step.
#[derive(Debug)]
pub struct HistoryBuffer {
    steps: VecDeque<Arc<Step>>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(n_step: usize) -> Self {
        let capacity = n_step.saturating_add(1);
        Self { steps: VecDeque::new(), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.steps.len() == self.capacity
    }

    /// Appends a step, returning the step evicted to stay within capacity.
    pub fn push(&mut self, step: Step) -> Option<Arc<Step>> {
        self.steps.push_back(Arc::new(step));
        if self.steps.len() > self.capacity {
            self.steps.pop_front()
        } else {
            None
        }
    }

    /// The full-length window, once `n_step + 1` steps have been seen.
    pub fn window(&self) -> Option<Series> {
        self.is_full()
            .then(|| Series::new(self.steps.iter().cloned().collect()))
    }

    /// Empties the buffer, returning every suffix window of length two or
    /// more, longest first. Used when the episode terminates.
    pub fn drain_suffixes(&mut self) -> Vec<Series> {
        let len = self.steps.len();
        let windows = (0..len.saturating_sub(1))
            .map(|start| Series::new(self.steps.range(start..).cloned().collect()))
            .collect();
        self.steps.clear();
        windows
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}
