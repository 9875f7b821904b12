use crate::RlError;
use ml::Tensor;

/// Maps one row of action values to an action index.
pub trait Policy {
    fn select(&mut self, action_values: &[f32]) -> Result<usize, RlError>;

    /// One action per row of a `[batch, actions]` tensor.
    fn select_batch(&mut self, action_values: &Tensor) -> Result<Vec<usize>, RlError> {
        (0..action_values.rows())
            .map(|row| self.select(action_values.row(row)))
            .collect()
    }
}

fn check_non_empty(action_values: &[f32]) -> Result<(), RlError> {
    if action_values.is_empty() {
        return Err(RlError::shape("action values", &[1], &[0]));
    }
    Ok(())
}

/// Samples from `softmax(values * temperature)`.
///
/// Higher temperatures sharpen the distribution towards the greedy action.
pub struct SoftmaxPolicy {
    temperature: f32,
    rng: fastrand::Rng,
}

impl SoftmaxPolicy {
    pub fn new(temperature: f32, seed: u64) -> Self {
        Self { temperature, rng: fastrand::Rng::with_seed(seed) }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn probabilities(&self, action_values: &[f32]) -> Vec<f32> {
        let scaled: Vec<f32> = action_values.iter().map(|v| v * self.temperature).collect();
        let max = scaled.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = scaled.iter().map(|v| (v - max).exp()).collect();
        let sum: f32 = exp.iter().sum();
        exp.iter().map(|e| e / sum).collect()
    }
}

impl Policy for SoftmaxPolicy {
    fn select(&mut self, action_values: &[f32]) -> Result<usize, RlError> {
        check_non_empty(action_values)?;
        let probs = self.probabilities(action_values);
        let draw = self.rng.f32();
        let mut acc = 0.0;
        for (action, p) in probs.iter().enumerate() {
            acc += p;
            if draw < acc {
                return Ok(action);
            }
        }
        // rounding left `acc` just below 1.0
        Ok(probs.len() - 1)
    }
}

/// Always picks the highest value, lowest index on ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn select(&mut self, action_values: &[f32]) -> Result<usize, RlError> {
        check_non_empty(action_values)?;
        Ok(argmax(action_values))
    }
}

fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
