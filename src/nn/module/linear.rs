use super::TraitModule;
use crate::nn::NetworkError;
use ndarray::Array1;

/// 线性（恒等传递）层：output = input
#[derive(Debug, Clone)]
pub struct LinearLayer {
    dim: usize,
}

impl LinearLayer {
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl TraitModule for LinearLayer {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn indim(&self) -> usize {
        self.dim
    }

    fn outdim(&self) -> usize {
        self.dim
    }

    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        input.clone()
    }

    fn backward(
        &mut self,
        outerr: &Array1<f32>,
        _input: &Array1<f32>,
        _output: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError> {
        Ok(outerr.clone())
    }
}
