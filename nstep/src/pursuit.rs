//! Demonstration environment: steer a block onto a target on a 64×64 screen.

use anyhow::{bail, Result};
use ml::Tensor;
use rl::{Env, Transition};

const SIZE: usize = 64;
const BLOCK: usize = 4;
const SPEED: i32 = 2;
const MAX_STEPS: usize = 200;
const CATCH_REWARD: f32 = 10.0;
const STEP_PENALTY: f32 = -0.01;

const AGENT_PIXEL: f32 = 1.0;
const TARGET_PIXEL: f32 = 0.5;

/// Nine actions: every combination of `{-1, 0, +1}` on both axes.
pub struct Pursuit {
    rng: fastrand::Rng,
    agent: (i32, i32),
    target: (i32, i32),
    steps: usize,
    shape: [usize; 3],
}

impl Pursuit {
    pub fn new(seed: u64) -> Self {
        let mut env = Self {
            rng: fastrand::Rng::with_seed(seed),
            agent: (0, 0),
            target: (0, 0),
            steps: 0,
            shape: [1, SIZE, SIZE],
        };
        env.place();
        env
    }

    fn random_corner(&mut self) -> (i32, i32) {
        let limit = (SIZE - BLOCK) as i32;
        (self.rng.i32(0..=limit), self.rng.i32(0..=limit))
    }

    fn place(&mut self) {
        self.agent = self.random_corner();
        self.target = self.random_corner();
        while self.caught() {
            self.target = self.random_corner();
        }
    }

    fn caught(&self) -> bool {
        let reach = BLOCK as i32;
        (self.agent.0 - self.target.0).abs() < reach && (self.agent.1 - self.target.1).abs() < reach
    }

    fn render(&self) -> Tensor {
        let mut pixels = Tensor::zeros(self.shape.to_vec());
        for ((x, y), value) in [(self.target, TARGET_PIXEL), (self.agent, AGENT_PIXEL)] {
            for row in y as usize..y as usize + BLOCK {
                let start = row * SIZE + x as usize;
                pixels.data[start..start + BLOCK].fill(value);
            }
        }
        pixels
    }
}

impl Env for Pursuit {
    fn reset(&mut self) -> Result<Tensor> {
        self.steps = 0;
        self.place();
        Ok(self.render())
    }

    fn step(&mut self, action: usize) -> Result<Transition> {
        if action >= 9 {
            bail!("pursuit has 9 actions, got {action}");
        }
        let limit = (SIZE - BLOCK) as i32;
        let (dx, dy) = ((action % 3) as i32 - 1, (action / 3) as i32 - 1);
        self.agent.0 = (self.agent.0 + dx * SPEED).clamp(0, limit);
        self.agent.1 = (self.agent.1 + dy * SPEED).clamp(0, limit);
        self.steps += 1;

        let mut reward = STEP_PENALTY;
        if self.caught() {
            reward += CATCH_REWARD;
            while self.caught() {
                self.target = self.random_corner();
            }
        }
        Ok(Transition {
            observation: self.render(),
            reward,
            done: self.steps >= MAX_STEPS,
        })
    }

    fn observation_shape(&self) -> &[usize] {
        &self.shape
    }

    fn action_count(&self) -> usize {
        9
    }
}
