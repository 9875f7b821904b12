use std::collections::VecDeque;

/// Moving average over the last `size` completed-episode rewards.
///
/// An empty window averages to `0.0`. This is a reporting convention so the
/// first epochs, before any episode finishes, log a defined value; it is not
/// an estimate of the reward.
#[derive(Clone, Debug)]
pub struct MovingAverage {
    rewards: VecDeque<f32>,
    size: usize,
}

impl MovingAverage {
    pub fn new(size: usize) -> Self {
        Self { rewards: VecDeque::with_capacity(size), size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn push(&mut self, reward: f32) {
        self.add([reward]);
    }

    /// Appends every reward, then drops the oldest until the window fits.
    pub fn add(&mut self, rewards: impl IntoIterator<Item = f32>) {
        self.rewards.extend(rewards);
        while self.rewards.len() > self.size {
            self.rewards.pop_front();
        }
    }

    pub fn average(&self) -> f32 {
        if self.rewards.is_empty() {
            return 0.0;
        }
        self.rewards.iter().sum::<f32>() / self.rewards.len() as f32
    }
}

impl Extend<f32> for MovingAverage {
    fn extend<I: IntoIterator<Item = f32>>(&mut self, iter: I) {
        self.add(iter);
    }
}
