#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

//! # n-step Deep Q-Learning
//!
//! Experience collection, replay and target construction for Q-learning over
//! pixel observations.
//!
//! - [`nstep::NStepProgress`] steps an [`env::Env`] and windows each episode
//!   into [`experience::Series`] of at most `n_step + 1` steps through a
//!   [`history::HistoryBuffer`].
//! - [`replay::ReplayMemory`] keeps the newest series and hands out shuffled,
//!   non-overlapping batches covering all of them.
//! - [`trace::EligibilityTrace`] turns a batch into regression targets,
//!   bootstrapping from the value function unless the series is terminal.
//! - [`moving_average::MovingAverage`] tracks completed-episode rewards.
//! - [`trainer::Trainer`] runs the epoch loop over all of the above.

pub mod config;
pub mod env;
mod error;
pub mod experience;
pub mod history;
pub mod moving_average;
pub mod nstep;
pub mod policy;
pub mod replay;
pub mod trace;
pub mod trainer;
pub mod value;

pub use config::{TrainConfig, MAX_N_STEP};
pub use env::{Env, Transition};
pub use error::RlError;
pub use experience::{Series, Step};
pub use moving_average::MovingAverage;
pub use nstep::NStepProgress;
pub use policy::{GreedyPolicy, Policy, SoftmaxPolicy};
pub use replay::{ReplayMemory, SharedReplayMemory};
pub use trace::{EligibilityTrace, TrainingBatch};
pub use trainer::{EpochReport, TrainSummary, Trainer};
pub use value::{QNetwork, ValueFunction};
