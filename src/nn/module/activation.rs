use super::TraitModule;
use crate::nn::NetworkError;
use ndarray::Array1;

/// Sigmoid 层
///
/// forward: sigmoid(x) = 1 / (1 + e^(-x))
/// backward: d(sigmoid)/dx = sigmoid(x) * (1 - sigmoid(x))，直接用缓存的输出计算
#[derive(Debug, Clone)]
pub struct SigmoidLayer {
    dim: usize,
}

impl SigmoidLayer {
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl TraitModule for SigmoidLayer {
    fn kind(&self) -> &'static str {
        "sigmoid"
    }

    fn indim(&self) -> usize {
        self.dim
    }

    fn outdim(&self) -> usize {
        self.dim
    }

    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        input.mapv(|x| 1.0 / (1.0 + (-x).exp()))
    }

    fn backward(
        &mut self,
        outerr: &Array1<f32>,
        _input: &Array1<f32>,
        output: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError> {
        Ok(outerr * &output.mapv(|y| y * (1.0 - y)))
    }
}

/// Tanh 层
///
/// backward: d(tanh)/dx = 1 - tanh(x)^2
#[derive(Debug, Clone)]
pub struct TanhLayer {
    dim: usize,
}

impl TanhLayer {
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl TraitModule for TanhLayer {
    fn kind(&self) -> &'static str {
        "tanh"
    }

    fn indim(&self) -> usize {
        self.dim
    }

    fn outdim(&self) -> usize {
        self.dim
    }

    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        input.mapv(f32::tanh)
    }

    fn backward(
        &mut self,
        outerr: &Array1<f32>,
        _input: &Array1<f32>,
        output: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError> {
        Ok(outerr * &output.mapv(|y| 1.0 - y * y))
    }
}
