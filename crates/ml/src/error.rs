use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("{context}: shape mismatch, expected {expected:?} got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl MlError {
    pub(crate) fn shape(context: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
