use ml::Tensor;

/// Outcome of one environment transition.
#[derive(Clone, Debug)]
pub struct Transition {
    pub observation: Tensor,
    pub reward: f32,
    pub done: bool,
}

/// Reinforcement learning environment with a discrete action space.
///
/// Each call to [`step`] applies one action and returns the next observation,
/// the scalar reward and whether the episode terminated. Observations must
/// always have the shape reported by [`observation_shape`].
///
/// [`step`]: Env::step
/// [`observation_shape`]: Env::observation_shape
pub trait Env {
    /// Reset to the start of a new episode and return the first observation.
    fn reset(&mut self) -> anyhow::Result<Tensor>;

    /// Advance the environment by one action.
    fn step(&mut self, action: usize) -> anyhow::Result<Transition>;

    /// Release whatever the environment holds. Called once when training ends.
    fn quit(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Shape of a single observation, e.g. `[1, 64, 64]`.
    fn observation_shape(&self) -> &[usize];

    /// Number of discrete actions.
    fn action_count(&self) -> usize;
}
