//! JSON export of a [`Sequential`] network.
//!
//! The document names its input and output tensors and marks the batch axis
//! as dynamic (`null`), so a consumer can feed any number of observations.

use crate::nn::{Dense, Relu, Sequential};
use crate::MlError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const INPUT_NAME: &str = "input";
pub const OUTPUT_NAME: &str = "output";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerRecord {
    Dense {
        in_dim: usize,
        out_dim: usize,
        weights: Vec<f32>,
        bias: Vec<f32>,
    },
    Relu,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub version: u32,
    pub input_name: String,
    pub output_name: String,
    /// Observation shape with a leading `None` batch axis.
    pub input_shape: Vec<Option<usize>>,
    pub output_shape: Vec<Option<usize>>,
    pub layers: Vec<LayerRecord>,
}

impl Checkpoint {
    pub fn new(observation_shape: &[usize], outputs: usize, net: &Sequential) -> Self {
        let input_shape = std::iter::once(None)
            .chain(observation_shape.iter().copied().map(Some))
            .collect();
        Self {
            version: FORMAT_VERSION,
            input_name: INPUT_NAME.to_string(),
            output_name: OUTPUT_NAME.to_string(),
            input_shape,
            output_shape: vec![None, Some(outputs)],
            layers: net.records(),
        }
    }

    /// Observation shape without the batch axis, if every entry is fixed.
    pub fn observation_shape(&self) -> Option<Vec<usize>> {
        self.input_shape.iter().skip(1).copied().collect()
    }

    pub fn outputs(&self) -> Option<usize> {
        self.output_shape.last().copied().flatten()
    }

    pub fn into_network(self) -> Result<Sequential, MlError> {
        if self.version != FORMAT_VERSION {
            return Err(MlError::InvalidParameter("unsupported checkpoint version"));
        }
        let mut net = Sequential::new();
        for layer in self.layers {
            match layer {
                LayerRecord::Dense { in_dim, out_dim, weights, bias } => {
                    net.push_boxed(Box::new(Dense::new(weights, bias, in_dim, out_dim)?));
                }
                LayerRecord::Relu => net.push_boxed(Box::new(Relu)),
            }
        }
        Ok(net)
    }

    pub fn to_json(&self) -> Result<String, MlError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MlError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes to a sibling temporary file first, then renames over `path`.
    pub fn save(&self, path: &Path) -> Result<(), MlError> {
        let tmp = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, MlError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
