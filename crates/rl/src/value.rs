use crate::RlError;
use ml::loss::{mse, mse_grad};
use ml::{Adam, Checkpoint, Dense, Relu, Sequential, Tensor};
use std::path::Path;

/// Action-value function `Q(state) -> values`, trained by regression.
pub trait ValueFunction {
    /// Shape of one observation, without the batch axis.
    fn observation_shape(&self) -> &[usize];

    fn action_count(&self) -> usize;

    /// Maps `[batch, ..observation]` states to `[batch, actions]` values.
    fn forward(&self, states: &Tensor) -> Result<Tensor, RlError>;

    /// One gradient step on the mean squared error between
    /// `forward(inputs)` and `targets`. Returns the loss before the step.
    fn update(&mut self, inputs: &Tensor, targets: &Tensor) -> Result<f32, RlError>;

    /// Writes the current parameters to `path`.
    fn export(&self, path: &Path) -> Result<(), RlError>;
}

/// Two-layer perceptron over flattened pixel observations, trained with Adam.
pub struct QNetwork {
    net: Sequential,
    optimizer: Adam,
    observation_shape: Vec<usize>,
    actions: usize,
}

impl QNetwork {
    pub fn new(
        observation_shape: &[usize],
        hidden_units: usize,
        actions: usize,
        learning_rate: f32,
        seed: u64,
    ) -> Result<Self, RlError> {
        let inputs: usize = observation_shape.iter().product();
        if inputs == 0 || hidden_units == 0 || actions == 0 {
            return Err(RlError::InvalidConfig(
                "network dimensions must be non-zero".into(),
            ));
        }
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut net = Sequential::new();
        net.push(Dense::random(inputs, hidden_units, &mut rng));
        net.push(Relu);
        net.push(Dense::random(hidden_units, actions, &mut rng));
        Ok(Self {
            net,
            optimizer: Adam::new(learning_rate),
            observation_shape: observation_shape.to_vec(),
            actions,
        })
    }

    /// Restores parameters from a checkpoint. Optimizer state starts fresh.
    pub fn from_checkpoint(checkpoint: Checkpoint, learning_rate: f32) -> Result<Self, RlError> {
        let observation_shape = checkpoint
            .observation_shape()
            .ok_or_else(|| RlError::InvalidConfig("checkpoint has a dynamic observation axis".into()))?;
        let actions = checkpoint
            .outputs()
            .ok_or_else(|| RlError::InvalidConfig("checkpoint has no fixed output width".into()))?;
        let net = checkpoint.into_network()?;
        let probe = net.predict(&Tensor::zeros(vec![1, observation_shape.iter().product()]))?;
        if probe.shape != [1, actions] {
            return Err(RlError::shape("checkpoint output", &[1, actions], &probe.shape));
        }
        Ok(Self {
            net,
            optimizer: Adam::new(learning_rate),
            observation_shape,
            actions,
        })
    }

    pub fn load(path: &Path, learning_rate: f32) -> Result<Self, RlError> {
        Self::from_checkpoint(Checkpoint::load(path)?, learning_rate)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(&self.observation_shape, self.actions, &self.net)
    }

    fn flatten(&self, states: &Tensor) -> Result<Tensor, RlError> {
        if states.shape.len() != self.observation_shape.len() + 1
            || states.shape[1..] != self.observation_shape[..]
        {
            let mut expected = vec![states.rows()];
            expected.extend_from_slice(&self.observation_shape);
            return Err(RlError::shape("value function input", &expected, &states.shape));
        }
        Ok(states.flatten_rows())
    }
}

impl ValueFunction for QNetwork {
    fn observation_shape(&self) -> &[usize] {
        &self.observation_shape
    }

    fn action_count(&self) -> usize {
        self.actions
    }

    fn forward(&self, states: &Tensor) -> Result<Tensor, RlError> {
        let x = self.flatten(states)?;
        Ok(self.net.predict(&x)?)
    }

    fn update(&mut self, inputs: &Tensor, targets: &Tensor) -> Result<f32, RlError> {
        let x = self.flatten(inputs)?;
        let (pred, activations) = self.net.forward(&x)?;
        let loss = mse(&pred, targets)?;
        let grad = mse_grad(&pred, targets)?;
        let (_, grads) = self.net.backward(&activations, &grad)?;
        let mut params: Vec<_> = self.net.params_mut().into_iter().zip(grads.iter()).collect();
        self.optimizer.step(&mut params)?;
        Ok(loss)
    }

    fn export(&self, path: &Path) -> Result<(), RlError> {
        Ok(self.checkpoint().save(path)?)
    }
}
