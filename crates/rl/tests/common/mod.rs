#![allow(dead_code)]

use ml::Tensor;
use rl::{Env, Policy, RlError, Step, Transition, ValueFunction};
use std::cell::Cell;
use std::path::Path;

pub const SHAPE: [usize; 3] = [1, 2, 2];

/// Observation `[episode, t, 0, 0]` where `t` counts steps within the episode.
pub fn observation(episode: usize, t: usize) -> Tensor {
    Tensor::from_vec(SHAPE.to_vec(), vec![episode as f32, t as f32, 0.0, 0.0])
}

/// Deterministic environment whose episodes end after `episode_len` steps.
pub struct ScriptedEnv {
    pub episode_len: usize,
    pub rewards: Vec<f32>,
    pub actions: usize,
    pub episode: usize,
    pub t: usize,
    pub resets: usize,
    pub quit_calls: usize,
    pub fail_on_step: Option<usize>,
    pub bad_shape_on_step: Option<usize>,
    steps: usize,
}

impl ScriptedEnv {
    pub fn new(episode_len: usize, rewards: Vec<f32>) -> Self {
        Self {
            episode_len,
            rewards,
            actions: 3,
            episode: 0,
            t: 0,
            resets: 0,
            quit_calls: 0,
            fail_on_step: None,
            bad_shape_on_step: None,
            steps: 0,
        }
    }
}

impl Env for ScriptedEnv {
    fn reset(&mut self) -> anyhow::Result<Tensor> {
        self.resets += 1;
        self.episode = self.resets;
        self.t = 0;
        Ok(observation(self.episode, self.t))
    }

    fn step(&mut self, action: usize) -> anyhow::Result<Transition> {
        assert!(action < self.actions);
        self.steps += 1;
        if self.fail_on_step == Some(self.steps) {
            anyhow::bail!("simulator crashed");
        }
        let reward = self.rewards[self.t % self.rewards.len()];
        self.t += 1;
        let observation = if self.bad_shape_on_step == Some(self.steps) {
            Tensor::zeros(vec![1, 3, 3])
        } else {
            observation(self.episode, self.t)
        };
        Ok(Transition { observation, reward, done: self.t >= self.episode_len })
    }

    fn quit(&mut self) -> anyhow::Result<()> {
        self.quit_calls += 1;
        Ok(())
    }

    fn observation_shape(&self) -> &[usize] {
        &SHAPE
    }

    fn action_count(&self) -> usize {
        self.actions
    }
}

/// `Q(s)[a] = scale * sum(s) + a`, counting calls.
pub struct LinearValue {
    pub actions: usize,
    pub scale: f32,
    pub forward_calls: Cell<usize>,
    pub forward_rows: Cell<usize>,
    pub updates: usize,
}

impl LinearValue {
    pub fn new(actions: usize, scale: f32) -> Self {
        Self { actions, scale, forward_calls: Cell::new(0), forward_rows: Cell::new(0), updates: 0 }
    }

    pub fn values(&self, state: &Tensor) -> Vec<f32> {
        let s: f32 = state.data.iter().sum();
        (0..self.actions).map(|a| self.scale * s + a as f32).collect()
    }
}

impl ValueFunction for LinearValue {
    fn observation_shape(&self) -> &[usize] {
        &SHAPE
    }

    fn action_count(&self) -> usize {
        self.actions
    }

    fn forward(&self, states: &Tensor) -> Result<Tensor, RlError> {
        self.forward_calls.set(self.forward_calls.get() + 1);
        self.forward_rows.set(self.forward_rows.get() + states.rows());
        let mut data = Vec::new();
        for row in 0..states.rows() {
            let s: f32 = states.row(row).iter().sum();
            data.extend((0..self.actions).map(|a| self.scale * s + a as f32));
        }
        Ok(Tensor::from_vec(vec![states.rows(), self.actions], data))
    }

    fn update(&mut self, _inputs: &Tensor, _targets: &Tensor) -> Result<f32, RlError> {
        self.updates += 1;
        Ok(0.0)
    }

    fn export(&self, _path: &Path) -> Result<(), RlError> {
        Ok(())
    }
}

/// Always returns the same action.
pub struct FixedPolicy(pub usize);

impl Policy for FixedPolicy {
    fn select(&mut self, _action_values: &[f32]) -> Result<usize, RlError> {
        Ok(self.0)
    }
}

pub fn step(id: f32, action: usize, reward: f32, done: bool) -> Step {
    Step { state: Tensor::from_vec(SHAPE.to_vec(), vec![id, 0.0, 0.0, 0.0]), action, reward, done }
}
