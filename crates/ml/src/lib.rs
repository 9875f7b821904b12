#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

//! Minimal CPU tensor and neural-network toolkit.
//!
//! Layers work on `[batch, features]` tensors with hand-written backward
//! passes; [`optim::Adam`] consumes the parameter gradients they produce.

pub mod checkpoint;
mod error;
pub mod loss;
pub mod nn;
pub mod optim;
mod tensor;

pub use checkpoint::{Checkpoint, LayerRecord};
pub use error::MlError;
pub use nn::{Dense, Layer, Relu, Sequential};
pub use optim::Adam;
pub use tensor::Tensor;
