use crate::checkpoint::LayerRecord;
use crate::{MlError, Tensor};

/// A differentiable layer operating on `[batch, features]` tensors.
pub trait Layer {
    fn forward(&self, x: &Tensor) -> Result<Tensor, MlError>;

    /// Returns the gradient with respect to `x` and the gradients of
    /// [`Layer::params`], in the same order.
    fn backward(&self, x: &Tensor, grad: &Tensor) -> Result<(Tensor, Vec<Tensor>), MlError>;

    fn params(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }

    fn record(&self) -> LayerRecord;
}

/// A fully connected layer, `y = x Wᵀ + b`.
#[derive(Clone, Debug)]
pub struct Dense {
    /// Weight matrix, `[out_dim, in_dim]`.
    pub w: Tensor,
    /// Bias vector, `[out_dim]`.
    pub b: Tensor,
    pub in_dim: usize,
    pub out_dim: usize,
}

impl Dense {
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_dim: usize, out_dim: usize) -> Result<Self, MlError> {
        if in_dim == 0 || out_dim == 0 {
            return Err(MlError::InvalidParameter("dense layer dimensions must be non-zero"));
        }
        Ok(Self {
            w: Tensor::try_from_vec(vec![out_dim, in_dim], weights)?,
            b: Tensor::try_from_vec(vec![out_dim], bias)?,
            in_dim,
            out_dim,
        })
    }

    /// Glorot-uniform weights and zero bias.
    pub fn random(in_dim: usize, out_dim: usize, rng: &mut fastrand::Rng) -> Self {
        let limit = (6.0 / (in_dim + out_dim) as f32).sqrt();
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        Self {
            w: Tensor::from_vec(vec![out_dim, in_dim], weights),
            b: Tensor::zeros(vec![out_dim]),
            in_dim,
            out_dim,
        }
    }

    fn check_input(&self, x: &Tensor) -> Result<usize, MlError> {
        if x.shape.len() != 2 || x.shape[1] != self.in_dim {
            return Err(MlError::shape("dense input", &[x.rows(), self.in_dim], &x.shape));
        }
        Ok(x.shape[0])
    }
}

impl Layer for Dense {
    fn forward(&self, x: &Tensor) -> Result<Tensor, MlError> {
        let batch = self.check_input(x)?;
        let mut y = vec![0f32; batch * self.out_dim];
        for n in 0..batch {
            let input = x.row(n);
            for o in 0..self.out_dim {
                let weights = &self.w.data[o * self.in_dim..(o + 1) * self.in_dim];
                let sum: f32 = weights.iter().zip(input).map(|(w, v)| w * v).sum();
                y[n * self.out_dim + o] = sum + self.b.data[o];
            }
        }
        Ok(Tensor::from_vec(vec![batch, self.out_dim], y))
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> Result<(Tensor, Vec<Tensor>), MlError> {
        let batch = self.check_input(x)?;
        if grad.shape != [batch, self.out_dim] {
            return Err(MlError::shape("dense gradient", &[batch, self.out_dim], &grad.shape));
        }
        let mut grad_input = vec![0.0; batch * self.in_dim];
        let mut grad_w = vec![0.0; self.in_dim * self.out_dim];
        let mut grad_b = vec![0.0; self.out_dim];
        for n in 0..batch {
            let input = x.row(n);
            for o in 0..self.out_dim {
                let go = grad.data[n * self.out_dim + o];
                for i in 0..self.in_dim {
                    grad_w[o * self.in_dim + i] += go * input[i];
                    grad_input[n * self.in_dim + i] += self.w.data[o * self.in_dim + i] * go;
                }
                grad_b[o] += go;
            }
        }
        Ok((
            Tensor::from_vec(vec![batch, self.in_dim], grad_input),
            vec![
                Tensor::from_vec(vec![self.out_dim, self.in_dim], grad_w),
                Tensor::from_vec(vec![self.out_dim], grad_b),
            ],
        ))
    }

    fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }

    fn record(&self) -> LayerRecord {
        LayerRecord::Dense {
            in_dim: self.in_dim,
            out_dim: self.out_dim,
            weights: self.w.data.clone(),
            bias: self.b.data.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Layer for Relu {
    fn forward(&self, x: &Tensor) -> Result<Tensor, MlError> {
        let data = x.data.iter().map(|&v| v.max(0.0)).collect();
        Ok(Tensor::from_vec(x.shape.clone(), data))
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> Result<(Tensor, Vec<Tensor>), MlError> {
        if grad.shape != x.shape {
            return Err(MlError::shape("relu gradient", &x.shape, &grad.shape));
        }
        let data = x
            .data
            .iter()
            .zip(&grad.data)
            .map(|(&v, &g)| if v > 0.0 { g } else { 0.0 })
            .collect();
        Ok((Tensor::from_vec(x.shape.clone(), data), Vec::new()))
    }

    fn record(&self) -> LayerRecord {
        LayerRecord::Relu
    }
}

/// Layers applied in order. Activations are kept by [`Sequential::forward`]
/// so [`Sequential::backward`] can replay them.
#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push(Box::new(layer));
    }

    pub(crate) fn push_boxed(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Runs every layer and returns the output with all intermediate
    /// activations, input first.
    pub fn forward(&self, x: &Tensor) -> Result<(Tensor, Vec<Tensor>), MlError> {
        let mut out = x.clone();
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        for layer in &self.layers {
            let next = layer.forward(&out)?;
            activations.push(std::mem::replace(&mut out, next));
        }
        activations.push(out.clone());
        Ok((out, activations))
    }

    /// Forward pass without keeping activations.
    pub fn predict(&self, x: &Tensor) -> Result<Tensor, MlError> {
        self.layers
            .iter()
            .try_fold(x.clone(), |out, layer| layer.forward(&out))
    }

    /// Backpropagates `grad` through the recorded activations.
    ///
    /// Parameter gradients are returned in the order of [`Sequential::params_mut`].
    pub fn backward(&self, activations: &[Tensor], grad: &Tensor) -> Result<(Tensor, Vec<Tensor>), MlError> {
        if activations.len() != self.layers.len() + 1 {
            return Err(MlError::InvalidParameter("activation count does not match layer count"));
        }
        let mut grad_out = grad.clone();
        let mut per_layer = Vec::with_capacity(self.layers.len());
        for (layer, activation) in self.layers.iter().zip(activations).rev() {
            let (g_in, params) = layer.backward(activation, &grad_out)?;
            grad_out = g_in;
            per_layer.push(params);
        }
        let param_grads = per_layer.into_iter().rev().flatten().collect();
        Ok((grad_out, param_grads))
    }

    pub fn params(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|layer| layer.params()).collect()
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut out = Vec::new();
        for layer in &mut self.layers {
            out.extend(layer.params_mut());
        }
        out
    }

    pub fn records(&self) -> Vec<LayerRecord> {
        self.layers.iter().map(|layer| layer.record()).collect()
    }
}
