use ml::MlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RlError {
    #[error("{context}: shape mismatch, expected {expected:?} got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("action {action} out of range for {actions} actions")]
    ActionOutOfRange { action: usize, actions: usize },
    #[error("invalid series: {0}")]
    InvalidSeries(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("environment has already quit")]
    EnvironmentClosed,
    #[error("environment failed: {0:#}")]
    Environment(#[source] anyhow::Error),
    #[error(transparent)]
    Ml(#[from] MlError),
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("json failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RlError {
    pub(crate) fn shape(context: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
