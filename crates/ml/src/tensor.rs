use crate::MlError;

/// Dense row-major `f32` buffer with an explicit shape.
///
/// The leading axis is treated as the batch axis by the layers in
/// [`crate::nn`]; a single observation of shape `[C, H, W]` becomes a batch
/// of one with [`Tensor::stack`].
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

impl Tensor {
    /// Builds a tensor, panicking when `data` does not fill `shape`.
    ///
    /// Use [`Tensor::try_from_vec`] for data coming from a collaborator.
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { data, shape }
    }

    pub fn try_from_vec(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, MlError> {
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(MlError::ShapeMismatch {
                context: "tensor data",
                expected: vec![expected],
                actual: vec![data.len()],
            });
        }
        Ok(Self { data, shape })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self { data: vec![0.0; len], shape }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the leading (batch) axis.
    pub fn rows(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Number of elements in one entry of the leading axis.
    pub fn row_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    pub fn row(&self, index: usize) -> &[f32] {
        let width = self.row_len();
        &self.data[index * width..(index + 1) * width]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut [f32] {
        let width = self.row_len();
        &mut self.data[index * width..(index + 1) * width]
    }

    /// Stacks equally shaped tensors along a new leading axis.
    pub fn stack(items: &[&Tensor]) -> Result<Tensor, MlError> {
        let first = items
            .first()
            .ok_or(MlError::InvalidParameter("cannot stack an empty list"))?;
        let mut data = Vec::with_capacity(first.len() * items.len());
        for item in items {
            if item.shape != first.shape {
                return Err(MlError::shape("stack", &first.shape, &item.shape));
            }
            data.extend_from_slice(&item.data);
        }
        let mut shape = Vec::with_capacity(first.shape.len() + 1);
        shape.push(items.len());
        shape.extend_from_slice(&first.shape);
        Ok(Tensor { data, shape })
    }

    pub fn reshape(self, shape: Vec<usize>) -> Result<Tensor, MlError> {
        if shape.iter().product::<usize>() != self.data.len() {
            return Err(MlError::shape("reshape", &shape, &self.shape));
        }
        Ok(Tensor { data: self.data, shape })
    }

    /// Collapses every axis after the first: `[B, C, H, W]` becomes `[B, C*H*W]`.
    pub fn flatten_rows(&self) -> Tensor {
        Tensor {
            data: self.data.clone(),
            shape: vec![self.rows(), self.row_len()],
        }
    }
}
