use crate::{MlError, Tensor};

/// Adam with bias-corrected moment estimates.
///
/// Moment buffers are allocated on the first [`Adam::step`] and must then
/// see the same parameter list, in the same order, on every call.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: i32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.001)
    }
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self { lr, beta1: 0.9, beta2: 0.999, eps: 1e-8, t: 0, m: Vec::new(), v: Vec::new() }
    }

    pub fn lr(&self) -> f32 {
        self.lr
    }

    pub fn steps(&self) -> i32 {
        self.t
    }

    pub fn step(&mut self, params: &mut [(&mut Tensor, &Tensor)]) -> Result<(), MlError> {
        for (p, g) in params.iter() {
            if p.shape != g.shape {
                return Err(MlError::shape("adam gradient", &p.shape, &g.shape));
            }
        }
        if self.m.is_empty() {
            self.m = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
            self.v = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
        }
        if self.m.len() != params.len() || self.m.iter().zip(params.iter()).any(|(m, (p, _))| m.len() != p.len()) {
            return Err(MlError::InvalidParameter("parameter list changed between optimizer steps"));
        }
        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2 = 1.0 - self.beta2.powi(self.t);
        for ((p, g), (m_vec, v_vec)) in params.iter_mut().zip(self.m.iter_mut().zip(self.v.iter_mut())) {
            for i in 0..p.len() {
                let gi = g.data[i];
                m_vec[i] = self.beta1 * m_vec[i] + (1.0 - self.beta1) * gi;
                v_vec[i] = self.beta2 * v_vec[i] + (1.0 - self.beta2) * gi * gi;
                let m_hat = m_vec[i] / bias1;
                let v_hat = v_vec[i] / bias2;
                p.data[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
        Ok(())
    }
}
