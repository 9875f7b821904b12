use crate::{MlError, Tensor};

fn check(pred: &Tensor, targets: &Tensor) -> Result<(), MlError> {
    if pred.shape != targets.shape {
        return Err(MlError::shape("mse targets", &pred.shape, &targets.shape));
    }
    if pred.is_empty() {
        return Err(MlError::InvalidParameter("mse over an empty tensor"));
    }
    Ok(())
}

/// Mean squared error over every element.
pub fn mse(pred: &Tensor, targets: &Tensor) -> Result<f32, MlError> {
    check(pred, targets)?;
    let sum: f32 = pred
        .data
        .iter()
        .zip(&targets.data)
        .map(|(&p, &t)| (p - t).powi(2))
        .sum();
    Ok(sum / pred.len() as f32)
}

/// Gradient of [`mse`] with respect to `pred`.
pub fn mse_grad(pred: &Tensor, targets: &Tensor) -> Result<Tensor, MlError> {
    check(pred, targets)?;
    let scale = 2.0 / pred.len() as f32;
    let data = pred
        .data
        .iter()
        .zip(&targets.data)
        .map(|(&p, &t)| scale * (p - t))
        .collect();
    Ok(Tensor::from_vec(pred.shape.clone(), data))
}
